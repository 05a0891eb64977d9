//! Cache-aside reads.
//!
//! [`load_with_cache`] is the one routine every read-through path goes through: try the
//! cache, fall back to a loader on miss, and populate the cache only when the loader
//! succeeds.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tenderhub_core::TenderResult;
use tracing::debug;

use super::key::CacheKey;
use super::layer::CacheLayer;

/// Result of a read-through lookup, recording where the value came from.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    /// Create a new cache read from a cache hit.
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            was_cache_hit: true,
        }
    }

    /// Create a new cache read from a store fetch (cache miss).
    pub fn from_storage(value: T) -> Self {
        Self {
            value,
            was_cache_hit: false,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit
    }
}

/// Serve `key` from the cache, or from `loader` on miss.
///
/// A cached value is only used if it decodes cleanly into `T`. On a miss the loader's
/// result is stored with `ttl`; loader errors (including not-found) are returned as-is
/// and leave the cache untouched.
///
/// There is no generation check before the store: a loader that read its snapshot before
/// a concurrent write committed and invalidated `key` still caches that older snapshot,
/// which is then served until `ttl` runs out.
pub fn load_with_cache<T, F>(
    cache: &CacheLayer,
    key: &CacheKey,
    ttl: Duration,
    loader: F,
) -> TenderResult<CacheRead<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> TenderResult<T>,
{
    if let Some(value) = cache.get::<T>(key) {
        debug!(key = %key, "Cache hit");
        return Ok(CacheRead::from_cache(value));
    }

    debug!(key = %key, "Cache miss; loading from store");
    let value = loader()?;
    cache.set(key, &value, ttl);
    Ok(CacheRead::from_storage(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tenderhub_core::{AccessError, TenderError, TenderId};

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn test_miss_then_hit() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::bid_collection(TenderId::new(1));
        let calls = Cell::new(0);
        let loader = || {
            calls.set(calls.get() + 1);
            Ok(vec![10u32, 20])
        };

        let first = load_with_cache(&cache, &key, TTL, loader).unwrap();
        assert!(first.was_cache_miss());
        assert_eq!(first.value(), &vec![10, 20]);

        let second = load_with_cache(&cache, &key, TTL, || {
            calls.set(calls.get() + 1);
            Ok(vec![99u32])
        })
        .unwrap();
        assert!(second.was_cache_hit());
        assert_eq!(second.into_value(), vec![10, 20]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_loader_error_is_not_cached() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::bid_collection(TenderId::new(1));

        let err = load_with_cache::<Vec<u32>, _>(&cache, &key, TTL, || {
            Err(AccessError::tender_not_found(TenderId::new(1)).into())
        })
        .unwrap_err();
        assert!(matches!(err, TenderError::Access(_)));
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn test_corrupt_entry_reloaded_and_repaired() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::tender_collection();
        cache.backend().set(&key, b"\x00garbage", TTL).unwrap();

        let read = load_with_cache(&cache, &key, TTL, || Ok(vec![1u32])).unwrap();
        assert!(read.was_cache_miss());
        assert_eq!(cache.get::<Vec<u32>>(&key), Some(vec![1]));
    }

    #[test]
    fn test_snapshot_older_than_concurrent_invalidation_is_cached() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::tender_collection();

        let read = load_with_cache(&cache, &key, TTL, || {
            let snapshot = vec![1u32];
            // a writer commits and invalidates after the snapshot was taken
            cache.invalidate(&key);
            Ok(snapshot)
        })
        .unwrap();
        assert!(read.was_cache_miss());

        let next = load_with_cache(&cache, &key, TTL, || Ok(vec![1u32, 2])).unwrap();
        assert!(next.was_cache_hit());
        assert_eq!(next.into_value(), vec![1]);
    }
}
