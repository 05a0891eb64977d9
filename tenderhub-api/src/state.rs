//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use tenderhub_market::{MarketContext, Marketplace};
use tenderhub_storage::MemoryStorage;

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// Application-wide state shared across all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Both lifecycle managers over one store and cache.
    pub market: Marketplace,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(market: Marketplace) -> Self {
        Self {
            market,
            start_time: Instant::now(),
        }
    }

    /// Wire the in-memory store to the configured cache backend.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let cache = config.build_cache()?;
        let ctx = MarketContext::new(Arc::new(MemoryStorage::new()), cache, config.market_config())?;
        Ok(Self::new(Marketplace::new(ctx)))
    }

    /// Seconds since the state was built.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

crate::impl_from_ref!(Marketplace, market);
