//! Verb-keyed route storage and registration-time validation

use std::collections::HashMap;
use std::fmt;

use crate::errors::RegistrationError;
use crate::registry::ComponentRegistry;
use crate::routing::path::normalize;

/// The closed set of verbs routes can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Update,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Update, Verb::Delete];

    /// Parse a transport method string. Methods outside the closed set
    /// yield `None` and can never match a route.
    pub fn parse(method: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verb| method.eq_ignore_ascii_case(verb.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to invoke when a route matches: a fully-qualified component name
/// (namespace prefix already applied) and one of its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerReference {
    pub component: String,
    pub operation: String,
}

/// Mapping from verb to normalized path to handler reference.
///
/// Created empty, populated only through registration calls during setup,
/// read-only afterwards. Registration validates targets eagerly so a defect
/// in the route wiring aborts startup instead of surfacing mid-traffic.
#[derive(Default)]
pub struct RouteTable {
    namespace_prefix: String,
    routes: HashMap<Verb, HashMap<String, HandlerReference>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace prefix prepended to every component token. Must be
    /// called before the registrations it should affect; registration
    /// validates against the prefix in effect at call time.
    pub fn set_namespace_prefix(&mut self, prefix: impl Into<String>) {
        self.namespace_prefix = prefix.into();
    }

    /// Register a route. `target` has the literal form
    /// `"<ComponentName>@<operationName>"`.
    ///
    /// The path is normalized before storage; a later registration for the
    /// same (verb, normalized path) silently replaces the earlier one.
    pub fn register(
        &mut self,
        registry: &ComponentRegistry,
        verb: Verb,
        raw_path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        let path = normalize(raw_path);
        let (component_token, operation) = parse_target(target)?;
        let component = format!("{}{}", self.namespace_prefix, component_token);

        let Some(operations) = registry.operations(&component) else {
            return Err(RegistrationError::UnknownComponent { component });
        };
        if !operations.iter().any(|name| *name == operation) {
            return Err(RegistrationError::UnknownOperation {
                component,
                operation: operation.to_string(),
            });
        }

        tracing::debug!(
            verb = %verb,
            path = %path,
            component = %component,
            operation = %operation,
            "route registered"
        );
        self.routes.entry(verb).or_default().insert(
            path,
            HandlerReference {
                component,
                operation: operation.to_string(),
            },
        );
        Ok(())
    }

    pub fn get(
        &mut self,
        registry: &ComponentRegistry,
        raw_path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        self.register(registry, Verb::Get, raw_path, target)
    }

    pub fn post(
        &mut self,
        registry: &ComponentRegistry,
        raw_path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        self.register(registry, Verb::Post, raw_path, target)
    }

    pub fn update(
        &mut self,
        registry: &ComponentRegistry,
        raw_path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        self.register(registry, Verb::Update, raw_path, target)
    }

    pub fn delete(
        &mut self,
        registry: &ComponentRegistry,
        raw_path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        self.register(registry, Verb::Delete, raw_path, target)
    }

    /// Pure read. The caller must normalize the path first; keys are stored
    /// normalized and matched exactly.
    pub fn lookup(&self, verb: Verb, normalized_path: &str) -> Option<&HandlerReference> {
        self.routes.get(&verb)?.get(normalized_path)
    }

    /// All registered routes in deterministic order: verbs in declaration
    /// order, paths lexicographically within a verb.
    pub fn entries(&self) -> Vec<(Verb, &str, &HandlerReference)> {
        let mut entries = Vec::new();
        for verb in Verb::ALL {
            let Some(routes) = self.routes.get(&verb) else {
                continue;
            };
            let mut paths: Vec<&String> = routes.keys().collect();
            paths.sort();
            for path in paths {
                if let Some(handler) = routes.get(path) {
                    entries.push((verb, path.as_str(), handler));
                }
            }
        }
        entries
    }

    /// Human-readable enumeration of the route table, one route per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (verb, path, handler) in self.entries() {
            out.push_str(&format!(
                "{:<6} {} -> {}@{}\n",
                verb.as_str(),
                path,
                handler.component,
                handler.operation
            ));
        }
        out
    }
}

/// Split a target string on `@` into exactly two non-empty tokens.
fn parse_target(target: &str) -> Result<(&str, &str), RegistrationError> {
    let mut tokens = target.split('@');
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(component), Some(operation), None)
            if !component.is_empty() && !operation.is_empty() =>
        {
            Ok((component, operation))
        }
        _ => Err(RegistrationError::MalformedTarget {
            target: target.to_string(),
        }),
    }
}
