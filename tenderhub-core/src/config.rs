//! Configuration types

use crate::{ConfigError, TenderResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time-to-live for read-through cache entries.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Lifecycle configuration shared by the tender and bid managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarketConfig {
    /// TTL applied to every cache population, in nanoseconds when serialized
    #[cfg_attr(feature = "openapi", schema(value_type = u64))]
    pub cache_ttl: Duration,
}

impl MarketConfig {
    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        Self { cache_ttl }
    }

    /// Validate the configuration.
    /// Returns Ok(()) if valid, Err(TenderError::Config) if invalid.
    pub fn validate(&self) -> TenderResult<()> {
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "cache_ttl".to_string(),
                value: format!("{:?}", self.cache_ttl),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}
