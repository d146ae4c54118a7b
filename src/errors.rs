use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::routing::table::Verb;

/// Error raised by a controller operation, propagated to the dispatch
/// caller without wrapping or suppression.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Setup-phase failures. These indicate a configuration defect and are
/// meant to abort startup before any traffic is accepted.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("malformed target '{target}': expected '<Component>@<operation>'")]
    MalformedTarget { target: String },
    #[error("unknown component '{component}'")]
    UnknownComponent { component: String },
    #[error("component '{component}' has no operation '{operation}'")]
    UnknownOperation {
        component: String,
        operation: String,
    },
}

/// Dispatch-time failures. `NoSuchRoute` is the only expected one; the
/// transport maps it to a not-found response. Everything else is either a
/// handler failure or an internal defect.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no route registered for {verb} {path}")]
    NoSuchRoute { verb: Verb, path: String },
    #[error("component '{0}' is not present in the registry")]
    UnregisteredComponent(String),
    #[error("{0}")]
    Handler(HandlerError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::NoSuchRoute { .. } => {
                (StatusCode::NOT_FOUND, "no_such_route", self.to_string())
            }
            Self::UnregisteredComponent(component) => {
                tracing::error!(component = %component, "route points at unregistered component");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
            Self::Handler(err) => {
                tracing::error!(error = %err, "handler failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}
