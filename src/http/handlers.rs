//! Axum handlers bridging the wire to the dispatcher
//!
//! Every request funnels through `dispatch_entry`; `show_routes` exposes the
//! route table for diagnostics.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::ErrorResponse;
use crate::routing::table::Verb;
use crate::AppState;

/// Fallback handler: hand the inbound verb and raw target to the
/// dispatcher. Methods outside the closed verb set cannot match any route
/// and get the same not-found shape as a routing miss.
pub async fn dispatch_entry(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().as_str().to_string();
    let raw_path = request
        .uri()
        .path_and_query()
        .map(|target| target.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let Some(verb) = Verb::parse(&method) else {
        return not_found(format!("unsupported method '{method}'"));
    };

    match state.dispatcher.dispatch(verb, &raw_path).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Diagnostic listing of every registered (verb, path, component,
/// operation) tuple. Read-only.
pub async fn show_routes(State(state): State<AppState>) -> Response {
    (StatusCode::OK, state.dispatcher.describe_routes()).into_response()
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: "no_such_route".to_string(),
            message,
            details: json!({}),
        }),
    )
        .into_response()
}
