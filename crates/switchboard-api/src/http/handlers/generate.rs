//! Dispatch endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use switchboard_core::prompt::CampaignBrief;
use switchboard_observe::dispatch_attrs;
use switchboard_types::generation::{GenerationRequest, GenerationResult};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub result: GenerationResult,
    pub user_message: String,
}

/// POST /api/v1/generate - Dispatch one generation request.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    tracing::Span::current().record(dispatch_attrs::REQUEST_ID, request_id.as_str());

    let result = state.orchestrator.invoke(&request).await;
    respond(result, request_id, start, "/api/v1/generate")
}

/// POST /api/v1/script - Four-scene ad script from a campaign brief.
pub async fn generate_script(
    State(state): State<AppState>,
    Json(brief): Json<CampaignBrief>,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    tracing::Span::current().record(dispatch_attrs::REQUEST_ID, request_id.as_str());

    if brief.product_name.trim().is_empty() {
        return Err(AppError::Validation("productName is required".to_string()));
    }

    let result = state.orchestrator.generate_script(&brief).await;
    respond(result, request_id, start, "/api/v1/script")
}

fn respond(
    result: GenerationResult,
    request_id: String,
    start: Instant,
    self_link: &str,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    let span = tracing::Span::current();
    span.record(dispatch_attrs::DISPATCH_PROVIDER, result.provider());

    match result {
        GenerationResult::Failure { provider, error } => {
            span.record(dispatch_attrs::DISPATCH_OUTCOME, dispatch_attrs::OUTCOME_FAILURE);
            Err(AppError::Dispatch { provider, error })
        }
        success @ GenerationResult::Success { .. } => {
            span.record(dispatch_attrs::DISPATCH_OUTCOME, dispatch_attrs::OUTCOME_SUCCESS);
            let elapsed = start.elapsed().as_millis() as u64;
            let data = GenerateResponse {
                user_message: success.user_message(),
                result: success,
            };
            Ok(Json(
                ApiResponse::success(data, request_id, elapsed).with_link("self", self_link),
            ))
        }
    }
}
