//! REST API Routes Module
//!
//! - Client routes: tender lifecycle and award
//! - Contractor routes: bid lifecycle
//! - Health, metrics, and the OpenAPI document (no actor required)

pub mod client;
pub mod contractor;
pub mod health;

use axum::{middleware::from_fn, response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use tenderhub_core::TenderResult;

use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub use client::create_router as client_router;
pub use contractor::create_router as contractor_router;
pub use health::create_router as health_router;

/// Run a synchronous marketplace call on the blocking pool.
///
/// The managers block on the store and cache, so they never run on an async worker.
pub async fn run_blocking<F, T>(op: F) -> ApiResult<T>
where
    F: FnOnce() -> TenderResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "Blocking task failed");
            Err(ApiError::internal_error("Internal server error"))
        }
    }
}

/// Handler for /api/openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Build the complete router.
///
/// # Middleware Order (outer to inner)
/// 1. Trace - request/response spans from tower-http
/// 2. Observability - Prometheus metrics and completion logs
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/client", client::create_router())
        .nest("/api/contractor", contractor::create_router())
        .route("/api/openapi.json", get(openapi_json))
        .merge(health::create_router())
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
}
