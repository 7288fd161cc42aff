//! Error responses for both route families.
//!
//! `/api/v1` routes use [`AppError`] and the envelope; relay routes answer
//! with the bare `{error, ...}` body the relay produced.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use switchboard_core::relay::RelayError;
use switchboard_types::error::DispatchError;
use switchboard_types::generation::APOLOGY_MESSAGE;

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    /// A dispatch that ended in failure, with the provider that produced it.
    Dispatch {
        provider: String,
        error: DispatchError,
    },
    Validation(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Dispatch { error, .. } => match error {
                DispatchError::Validation { .. } | DispatchError::UnknownCapability { .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                }
                DispatchError::QuotaExhausted { .. } => {
                    (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXHAUSTED")
                }
                DispatchError::Configuration { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
                }
                DispatchError::Upstream { .. } | DispatchError::Parse { .. } => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                }
            },
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let (message, details) = match &self {
            AppError::Dispatch { provider, error } => (
                error.to_string(),
                Some(json!({
                    "provider": provider,
                    "user_message": APOLOGY_MESSAGE,
                })),
            ),
            AppError::Validation(msg) => (msg.clone(), None),
        };

        let body = ApiResponse::error(code, &message, details, uuid::Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}

/// Relay failure as status plus `{error, ...}` body.
pub fn relay_error_response(err: &RelayError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.body())).into_response()
}
