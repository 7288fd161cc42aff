//! Capability table and usage endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use switchboard_types::capability::Capability;
use switchboard_types::provider::{DailyLimit, QualityTier, SpeedTier, Transport};
use switchboard_types::usage::UsageSnapshot;

use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CapabilityView {
    pub capability: Capability,
    pub fallback: Option<String>,
    pub providers: Vec<ProviderView>,
}

#[derive(Debug, Serialize)]
pub struct ProviderView {
    pub name: String,
    pub transport: Transport,
    pub daily_limit: DailyLimit,
    /// `None` when unbounded.
    pub remaining: Option<u32>,
    pub quality: QualityTier,
    pub speed: SpeedTier,
}

/// The capability table with today's remaining budget per provider.
pub fn capability_views(state: &AppState) -> Vec<CapabilityView> {
    let orchestrator = &state.orchestrator;
    let snapshot = orchestrator.usage_snapshot();
    orchestrator
        .registry()
        .all()
        .map(|(capability, providers)| CapabilityView {
            capability,
            fallback: orchestrator
                .registry()
                .designated_fallback(capability)
                .map(|p| p.name.clone()),
            providers: providers
                .iter()
                .map(|p| ProviderView {
                    name: p.name.clone(),
                    transport: p.transport(),
                    daily_limit: p.daily_limit,
                    remaining: snapshot.remaining(&p.name),
                    quality: p.quality,
                    speed: p.speed,
                })
                .collect(),
        })
        .collect()
}

/// GET /api/v1/providers - Providers per capability in preference order.
pub async fn list_providers(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<CapabilityView>>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let views = capability_views(&state);
    let elapsed = start.elapsed().as_millis() as u64;

    Json(ApiResponse::success(views, request_id, elapsed).with_link("self", "/api/v1/providers"))
}

/// GET /api/v1/usage - Today's usage counters and limits.
pub async fn get_usage(State(state): State<AppState>) -> Json<ApiResponse<UsageSnapshot>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let snapshot = state.orchestrator.usage_snapshot();
    let elapsed = start.elapsed().as_millis() as u64;

    Json(ApiResponse::success(snapshot, request_id, elapsed).with_link("self", "/api/v1/usage"))
}
