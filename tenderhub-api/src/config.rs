//! API Configuration Module
//!
//! Server address and cache settings, loaded from environment variables with
//! development defaults. Unlike a silent fallback, a value that is present but
//! unparseable is reported as a [`ConfigError`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tenderhub_core::{CacheError, ConfigError, MarketConfig, TenderResult, DEFAULT_CACHE_TTL};
use tenderhub_storage::{CacheLayer, InMemoryCacheBackend, LmdbCacheBackend};

/// Which cache backend the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Lmdb,
}

impl FromStr for CacheBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackendKind::Memory),
            "lmdb" => Ok(CacheBackendKind::Lmdb),
            other => Err(ConfigError::InvalidValue {
                field: "TENDERHUB_CACHE_BACKEND".to_string(),
                value: other.to_string(),
                reason: "expected 'memory' or 'lmdb'".to_string(),
            }),
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub bind_host: String,

    pub port: u16,

    pub cache_backend: CacheBackendKind,

    /// LMDB directory; ignored by the in-memory backend.
    pub cache_path: PathBuf,

    /// LMDB map size in megabytes.
    pub cache_max_mb: usize,

    /// TTL for every read-through cache entry.
    pub cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cache_backend: CacheBackendKind::Memory,
            cache_path: PathBuf::from("./data/cache"),
            cache_max_mb: 64,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TENDERHUB_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `TENDERHUB_API_PORT`: Listen port (default: 3000)
    /// - `TENDERHUB_CACHE_BACKEND`: "memory" or "lmdb" (default: memory)
    /// - `TENDERHUB_CACHE_PATH`: LMDB directory (default: ./data/cache)
    /// - `TENDERHUB_CACHE_MAX_MB`: LMDB map size (default: 64)
    /// - `TENDERHUB_CACHE_TTL_SECS`: Cache entry TTL (default: 600)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("TENDERHUB_API_BIND").unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("TENDERHUB_API_PORT")) {
            Some(raw) => parse_value("TENDERHUB_API_PORT", &raw)?,
            None => defaults.port,
        };

        let cache_backend = match lookup("TENDERHUB_CACHE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.cache_backend,
        };

        let cache_path = lookup("TENDERHUB_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);

        let cache_max_mb = match lookup("TENDERHUB_CACHE_MAX_MB") {
            Some(raw) => parse_value("TENDERHUB_CACHE_MAX_MB", &raw)?,
            None => defaults.cache_max_mb,
        };

        let cache_ttl = match lookup("TENDERHUB_CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_value("TENDERHUB_CACHE_TTL_SECS", &raw)?),
            None => defaults.cache_ttl,
        };

        let config = Self {
            bind_host,
            port,
            cache_backend,
            cache_path,
            cache_max_mb,
            cache_ttl,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TENDERHUB_CACHE_MAX_MB".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "TENDERHUB_CACHE_TTL_SECS".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "TENDERHUB_API_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }

    pub fn market_config(&self) -> MarketConfig {
        MarketConfig::with_cache_ttl(self.cache_ttl)
    }

    /// Open the configured cache backend, empty.
    pub fn build_cache(&self) -> TenderResult<CacheLayer> {
        match self.cache_backend {
            CacheBackendKind::Memory => Ok(CacheLayer::new(Arc::new(InMemoryCacheBackend::new()))),
            CacheBackendKind::Lmdb => {
                let backend = LmdbCacheBackend::new(&self.cache_path, self.cache_max_mb)
                    .map_err(CacheError::from)?;
                // The store starts empty on every boot, so nothing persisted from an
                // earlier process can be served.
                let cleared = backend.clear().map_err(CacheError::from)?;
                if cleared > 0 {
                    tracing::info!(
                        path = %self.cache_path.display(),
                        cleared,
                        "Cleared cache entries left by a previous run"
                    );
                }
                Ok(CacheLayer::new(Arc::new(backend)))
            }
        }
    }
}

fn parse_value<T>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_backend, CacheBackendKind::Memory);
        assert_eq!(config.cache_path, PathBuf::from("./data/cache"));
        assert_eq!(config.cache_max_mb, 64);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_port_prefers_plain_port_var() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("TENDERHUB_API_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);

        let config = ApiConfig::from_lookup(lookup(&[("TENDERHUB_API_PORT", "9090")])).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "TENDERHUB_API_PORT"));

        let err = ApiConfig::from_lookup(lookup(&[("TENDERHUB_CACHE_BACKEND", "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "redis"));

        assert!(ApiConfig::from_lookup(lookup(&[("TENDERHUB_CACHE_TTL_SECS", "0")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("TENDERHUB_CACHE_MAX_MB", "-1")])).is_err());
    }

    #[test]
    fn test_cache_settings() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("TENDERHUB_CACHE_BACKEND", " LMDB "),
            ("TENDERHUB_CACHE_PATH", "/tmp/tenderhub"),
            ("TENDERHUB_CACHE_MAX_MB", "16"),
            ("TENDERHUB_CACHE_TTL_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.cache_backend, CacheBackendKind::Lmdb);
        assert_eq!(config.cache_path, PathBuf::from("/tmp/tenderhub"));
        assert_eq!(config.cache_max_mb, 16);
        assert_eq!(config.market_config().cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_bind_addr() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:3000");

        let config = ApiConfig {
            bind_host: "not a host".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_build_lmdb_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = ApiConfig {
            cache_backend: CacheBackendKind::Lmdb,
            cache_path: dir.path().join("cache"),
            cache_max_mb: 8,
            ..ApiConfig::default()
        };
        let cache = config.build_cache().unwrap();
        assert_eq!(cache.stats().entry_count, 0);
    }
}
