use std::sync::Arc;

use async_trait::async_trait;
use controller_router::{
    build_app, config::Config, errors::HandlerError, logging, AppState, ComponentRegistry,
    Controller, Dispatcher, RouteTable,
};
use serde_json::{json, Value};
use tracing::info;

#[derive(Default)]
struct StatusController;

#[async_trait]
impl Controller for StatusController {
    fn operations() -> &'static [&'static str] {
        &["show"]
    }

    async fn invoke(&mut self, operation: &str, args: &[Value]) -> Result<Value, HandlerError> {
        match operation {
            "show" => Ok(json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "global_arguments": args,
            })),
            other => Err(format!("unknown operation '{other}'").into()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let mut registry = ComponentRegistry::new();
    registry.register::<StatusController>(format!(
        "{}StatusController",
        config.controller_namespace
    ));

    let mut table = RouteTable::new();
    table.set_namespace_prefix(config.controller_namespace.clone());
    table.get(&registry, "/status", "StatusController@show")?;

    let mut dispatcher = Dispatcher::new(registry, table);
    dispatcher.set_global_arguments(config.global_arguments.clone());

    let state = AppState::new(Arc::new(dispatcher));
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_socket()?).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
