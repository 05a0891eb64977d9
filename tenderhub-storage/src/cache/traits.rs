//! Cache backend trait and statistics.

use std::time::Duration;
use tenderhub_core::CacheError;

use super::key::CacheKey;

/// Result type for backend operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend trait for pluggable cache implementations.
///
/// Backends store opaque bytes under a [`CacheKey`] with an expiration. They know
/// nothing about the entities being cached; serialization happens in
/// [`CacheLayer`](super::CacheLayer). Implementations must be safe to share across
/// request workers.
pub trait CacheBackend: Send + Sync {
    /// Get the bytes stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or expired. `Err` is reserved for
    /// transport or backend faults.
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`.
    fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &CacheKey) -> CacheResult<()>;

    /// Drop every expired entry, returning how many were removed.
    fn purge_expired(&self) -> CacheResult<u64>;

    /// Get cache statistics.
    fn stats(&self) -> CacheStats;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses, including expired entries.
    pub misses: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
    /// Approximate size of stored values in bytes.
    pub memory_bytes: u64,
    /// Number of entries dropped because their TTL elapsed.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
