use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod registry;
pub mod routing;

pub use registry::{ComponentRegistry, Controller};
pub use routing::{Dispatcher, HandlerReference, RouteTable, Verb};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Assemble the transport application: a diagnostic route listing plus a
/// fallback that funnels everything else into the dispatcher.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/_routes", get(http::handlers::show_routes))
        .fallback(http::handlers::dispatch_entry)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::errors::HandlerError;

    use super::*;

    #[derive(Default)]
    struct UserController;

    #[async_trait]
    impl Controller for UserController {
        fn operations() -> &'static [&'static str] {
            &["list", "replace", "remove", "fail", "echo"]
        }

        async fn invoke(&mut self, operation: &str, args: &[Value]) -> Result<Value, HandlerError> {
            match operation {
                "list" => Ok(json!(["alice", "bob"])),
                "replace" => Ok(json!({"replaced": true})),
                "remove" => Ok(json!({"removed": true})),
                "fail" => Err("database unavailable".into()),
                "echo" => Ok(json!(args)),
                other => Err(format!("unknown operation '{other}'").into()),
            }
        }
    }

    fn app() -> Router {
        app_with_global_args(Vec::new())
    }

    fn app_with_global_args(args: Vec<Value>) -> Router {
        let mut registry = ComponentRegistry::new();
        registry.register::<UserController>("UserController");

        let mut table = RouteTable::new();
        table
            .get(&registry, "/users", "UserController@list")
            .expect("valid registration");
        table
            .update(&registry, "/users", "UserController@replace")
            .expect("valid registration");
        table
            .delete(&registry, "/users", "UserController@remove")
            .expect("valid registration");
        table
            .get(&registry, "/fail", "UserController@fail")
            .expect("valid registration");
        table
            .get(&registry, "/echo", "UserController@echo")
            .expect("valid registration");

        let mut dispatcher = Dispatcher::new(registry, table);
        dispatcher.set_global_arguments(args);
        build_app(AppState::new(Arc::new(dispatcher)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&body).expect("valid json response")
    }

    #[tokio::test]
    async fn registered_route_dispatches() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["alice", "bob"]));
    }

    #[tokio::test]
    async fn trailing_slash_and_query_reach_the_same_route() {
        for uri in ["/users/", "/users?page=2", "//users/"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .uri(uri)
                        .method("GET")
                        .body(Body::empty())
                        .expect("request build"),
                )
                .await
                .expect("request execution");

            assert_eq!(response.status(), StatusCode::OK, "failed for {uri:?}");
            assert_eq!(body_json(response).await, json!(["alice", "bob"]));
        }
    }

    #[tokio::test]
    async fn unregistered_path_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "no_such_route");
    }

    #[tokio::test]
    async fn verb_isolation_maps_to_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .method("POST")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_verb_round_trips() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .method("UPDATE")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"replaced": true}));
    }

    #[tokio::test]
    async fn delete_verb_round_trips() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .method("DELETE")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"removed": true}));
    }

    #[tokio::test]
    async fn method_outside_verb_set_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .method("PATCH")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "no_such_route");
    }

    #[tokio::test]
    async fn handler_failure_is_internal_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/fail")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "internal_error");
        // Handler detail stays in the logs, not the response.
        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn global_arguments_reach_the_handler() {
        let response = app_with_global_args(vec![json!("db"), json!(42)])
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["db", 42]));
    }

    #[tokio::test]
    async fn route_listing_enumerates_registered_routes() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/_routes")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let listing = String::from_utf8(body.to_vec()).expect("utf-8 listing");

        assert_eq!(listing.lines().count(), 5);
        assert!(listing.contains("GET    /users -> UserController@list"));
        assert!(listing.contains("UPDATE /users -> UserController@replace"));
        assert!(listing.contains("DELETE /users -> UserController@remove"));
    }
}
