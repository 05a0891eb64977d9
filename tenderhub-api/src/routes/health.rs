//! Health Check Endpoint
//!
//! Liveness plus cache counters. No actor required.

use axum::{extract::State, routing::get, Json, Router};

use crate::state::AppState;
use crate::types::{CacheHealth, HealthResponse};

/// GET /health - Liveness and cache statistics
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        cache: CacheHealth::from(state.market.context().cache().stats()),
    })
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
