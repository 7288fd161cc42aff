//! Relay endpoints: `/api/deepseek` and `/api/gemini`.
//!
//! Bodies are taken raw so the relay decides what counts as invalid input
//! and answers in its own `{error}` schema.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use switchboard_observe::dispatch_attrs;

use crate::http::error::relay_error_response;
use crate::state::AppState;

/// POST /api/deepseek - Chat-completions relay.
pub async fn chat_relay(State(state): State<AppState>, body: Bytes) -> Response {
    match state.chat_relay.handle(&body).await {
        Ok(reply) => {
            record_outcome(dispatch_attrs::OUTCOME_SUCCESS);
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(err) => {
            record_outcome(dispatch_attrs::OUTCOME_FAILURE);
            tracing::warn!(status = err.status_code(), error = %err, "Chat relay failed");
            relay_error_response(&err)
        }
    }
}

/// POST /api/gemini - Multimodal relay with optional function calling.
pub async fn multimodal_relay(State(state): State<AppState>, body: Bytes) -> Response {
    match state.multimodal_relay.handle(&body).await {
        Ok(reply) => {
            record_outcome(dispatch_attrs::OUTCOME_SUCCESS);
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(err) => {
            record_outcome(dispatch_attrs::OUTCOME_FAILURE);
            tracing::warn!(status = err.status_code(), error = %err, "Multimodal relay failed");
            relay_error_response(&err)
        }
    }
}

/// Any non-POST method on a relay path.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn record_outcome(outcome: &str) {
    tracing::Span::current().record(dispatch_attrs::DISPATCH_OUTCOME, outcome);
}
