//! TenderHub API Server Entry Point
//!
//! Loads configuration, opens the cache, and starts the Axum HTTP server.

use std::time::Duration;

use tenderhub_api::telemetry::{init_tracing, TelemetryConfig};
use tenderhub_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use tenderhub_core::TenderError;
use tenderhub_market::Marketplace;

/// How often expired cache entries are swept.
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::default())?;

    let config = ApiConfig::from_env().map_err(TenderError::from)?;
    let state = AppState::from_config(&config)?;
    tracing::info!(
        cache_backend = ?config.cache_backend,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Marketplace initialized"
    );

    tokio::spawn(purge_expired_entries(state.market.clone()));

    let app = create_api_router(state);

    let addr = config.bind_addr().map_err(TenderError::from)?;
    tracing::info!(%addr, "Starting TenderHub API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Periodically drop expired cache entries. Reads already ignore them; this
/// keeps the backend from growing.
async fn purge_expired_entries(market: Marketplace) {
    let mut ticker = tokio::time::interval(CACHE_PURGE_INTERVAL);
    loop {
        ticker.tick().await;
        let market = market.clone();
        match tokio::task::spawn_blocking(move || market.context().cache().purge_expired()).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Purged expired cache entries"),
            Err(e) => tracing::warn!(error = %e, "Cache purge task failed"),
        }
    }
}
