//! Request dispatch
//!
//! Owns the frozen route table, the component registry and the global
//! dispatch arguments. Stateless across calls: every dispatch normalizes,
//! looks up, instantiates a fresh controller and invokes one operation.

use serde_json::Value;

use crate::errors::DispatchError;
use crate::registry::ComponentRegistry;
use crate::routing::path::normalize;
use crate::routing::table::{RouteTable, Verb};

pub struct Dispatcher {
    registry: ComponentRegistry,
    table: RouteTable,
    global_args: Vec<Value>,
}

impl Dispatcher {
    /// Take ownership of a populated registry and table. Registration is
    /// over at this point; the dispatcher is read-only and can be shared
    /// behind an `Arc`.
    pub fn new(registry: ComponentRegistry, table: RouteTable) -> Self {
        Self {
            registry,
            table,
            global_args: Vec::new(),
        }
    }

    /// Set the positional arguments applied to every dispatched operation.
    /// Configured once, before serving begins.
    pub fn set_global_arguments(&mut self, args: Vec<Value>) {
        self.global_args = args;
    }

    /// Resolve and invoke the handler for (verb, raw path).
    ///
    /// A miss yields [`DispatchError::NoSuchRoute`]; errors raised by the
    /// handler itself come back unchanged inside [`DispatchError::Handler`].
    pub async fn dispatch(&self, verb: Verb, raw_path: &str) -> Result<Value, DispatchError> {
        let path = normalize(raw_path);
        let Some(handler) = self.table.lookup(verb, &path) else {
            tracing::debug!(verb = %verb, path = %path, "no matching route");
            return Err(DispatchError::NoSuchRoute { verb, path });
        };

        // Registration validated the component against this registry, so a
        // miss here means the table and registry were built apart.
        let mut instance = self
            .registry
            .instantiate(&handler.component)
            .ok_or_else(|| DispatchError::UnregisteredComponent(handler.component.clone()))?;

        tracing::debug!(
            verb = %verb,
            path = %path,
            component = %handler.component,
            operation = %handler.operation,
            "dispatching"
        );
        instance
            .invoke(&handler.operation, &self.global_args)
            .await
            .map_err(DispatchError::Handler)
    }

    /// Human-readable enumeration of the registered routes.
    pub fn describe_routes(&self) -> String {
        self.table.describe()
    }
}
