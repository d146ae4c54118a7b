//! Component registry and the controller abstraction
//!
//! Replaces instantiation-by-name with an explicit mapping from component
//! names to factory functions, so existence and operation checks are plain
//! lookups performed eagerly at route registration.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::HandlerError;

/// A unit of work that routes can point at.
///
/// Controllers declare their operations statically and are invoked by
/// operation name. The dispatcher only invokes operations listed by
/// [`Controller::operations`]; implementations should still return an error
/// for anything else rather than panic.
#[async_trait]
pub trait Controller: Send {
    /// Names of the operations this controller exposes.
    fn operations() -> &'static [&'static str]
    where
        Self: Sized;

    /// Run one operation with the positional arguments configured on the
    /// dispatcher.
    async fn invoke(&mut self, operation: &str, args: &[Value]) -> Result<Value, HandlerError>;
}

type ComponentFactory = Box<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

struct ComponentEntry {
    factory: ComponentFactory,
    operations: &'static [&'static str],
}

/// Mapping from fully-qualified component names to controller factories.
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentEntry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller type under a component name. Re-registering a
    /// name replaces the previous entry.
    pub fn register<C>(&mut self, name: impl Into<String>)
    where
        C: Controller + Default + 'static,
    {
        let name = name.into();
        tracing::debug!(component = %name, "component registered");
        self.components.insert(
            name,
            ComponentEntry {
                factory: Box::new(|| Box::new(C::default()) as Box<dyn Controller>),
                operations: C::operations(),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Operation list for a component, or `None` if the component is not
    /// registered.
    pub fn operations(&self, name: &str) -> Option<&'static [&'static str]> {
        self.components.get(name).map(|entry| entry.operations)
    }

    /// Produce a fresh controller instance. Each call returns a new
    /// instance; nothing is pooled or reused.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.components.get(name).map(|entry| (entry.factory)())
    }
}
