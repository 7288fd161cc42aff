//! Axum router configuration with middleware.
//!
//! - `/api/deepseek`, `/api/gemini`: relays, POST only, proxy error schema.
//! - `/api/v1/*`: dispatch and introspection, envelope format.
//! - `/health`: liveness.
//!
//! Middleware: CORS (any origin, for browser callers) and request tracing.

use std::time::Duration;

use axum::Router;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use switchboard_core::dispatch::builtin::{CHAT_RELAY_PATH, MULTIMODAL_RELAY_PATH};
use switchboard_observe::dispatch_attrs;

use crate::http::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/generate", post(handlers::generate::generate))
        .route("/script", post(handlers::generate::generate_script))
        .route("/providers", get(handlers::providers::list_providers))
        .route("/usage", get(handlers::providers::get_usage));

    Router::new()
        .route(
            CHAT_RELAY_PATH,
            post(handlers::relay::chat_relay).fallback(handlers::relay::method_not_allowed),
        )
        .route(
            MULTIMODAL_RELAY_PATH,
            post(handlers::relay::multimodal_relay).fallback(handlers::relay::method_not_allowed),
        )
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(record_response),
        )
        .with_state(state)
}

fn make_request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = %request.uri().path(),
        http.status_code = tracing::field::Empty,
        request.id = tracing::field::Empty,
        dispatch.provider = tracing::field::Empty,
        dispatch.outcome = tracing::field::Empty,
    )
}

fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record(dispatch_attrs::HTTP_STATUS, response.status().as_u16());
    tracing::debug!(latency_ms = latency.as_millis() as u64, "Request finished");
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
