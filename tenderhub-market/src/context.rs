//! Shared handles passed to every manager.

use std::sync::Arc;
use std::time::Duration;

use tenderhub_core::{MarketConfig, TenderResult};
use tenderhub_storage::{CacheLayer, MemoryStorage, StorageTrait};

/// Store, cache, and configuration for one marketplace instance.
///
/// Built once at startup and cloned into each manager; there are no process-wide
/// globals behind it.
#[derive(Clone)]
pub struct MarketContext {
    store: Arc<dyn StorageTrait>,
    cache: CacheLayer,
    config: MarketConfig,
}

impl MarketContext {
    /// Create a context, validating `config`.
    pub fn new(
        store: Arc<dyn StorageTrait>,
        cache: CacheLayer,
        config: MarketConfig,
    ) -> TenderResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            cache,
            config,
        })
    }

    /// In-memory store and cache with default configuration.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStorage::new()),
            cache: CacheLayer::in_memory(),
            config: MarketConfig::default(),
        }
    }

    pub fn store(&self) -> &dyn StorageTrait {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn cache_ttl(&self) -> Duration {
        self.config.cache_ttl
    }
}

impl std::fmt::Debug for MarketContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketContext")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
