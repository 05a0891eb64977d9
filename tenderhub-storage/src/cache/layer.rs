//! Typed, best-effort handle over a cache backend.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tenderhub_core::CacheError;
use tracing::{debug, warn};

use super::key::CacheKey;
use super::memory::InMemoryCacheBackend;
use super::traits::{CacheBackend, CacheStats};

/// JSON-serializing wrapper around a [`CacheBackend`].
///
/// Nothing here returns an error. A backend fault or an undecodable entry on read is
/// logged and reported as a miss; a failed write or delete is logged and dropped. The
/// store stays authoritative either way, and the worst outcome of a lost invalidation
/// is a stale entry that lives until its TTL.
#[derive(Clone)]
pub struct CacheLayer {
    backend: Arc<dyn CacheBackend>,
}

impl CacheLayer {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Layer over a fresh [`InMemoryCacheBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCacheBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Read and decode the value under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed; treating as miss");
                return None;
            }
        };
        match decode(key, &bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cache entry; treating as miss");
                None
            }
        }
    }

    /// Encode and store `value` under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let bytes = match encode(key, value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = self.backend.set(key, &bytes, ttl) {
            warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    /// Remove `key` so the next read goes to the store.
    pub fn invalidate(&self, key: &CacheKey) {
        match self.backend.delete(key) {
            Ok(()) => debug!(key = %key, "Cache entry invalidated"),
            Err(e) => warn!(key = %key, error = %e, "Cache invalidation failed"),
        }
    }

    /// Remove every key in `keys`. A failure on one key does not stop the rest.
    pub fn invalidate_all<I>(&self, keys: I)
    where
        I: IntoIterator<Item = CacheKey>,
    {
        for key in keys {
            self.invalidate(&key);
        }
    }

    pub fn purge_expired(&self) -> u64 {
        match self.backend.purge_expired() {
            Ok(purged) => purged,
            Err(e) => {
                warn!(error = %e, "Cache purge failed");
                0
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }
}

fn decode<T: DeserializeOwned>(key: &CacheKey, bytes: &[u8]) -> Result<T, CacheError> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Deserialization {
        key: key.encode(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize + ?Sized>(key: &CacheKey, value: &T) -> Result<Vec<u8>, CacheError> {
    serde_json::to_vec(value).map_err(|e| CacheError::Serialization {
        key: key.encode(),
        reason: e.to_string(),
    })
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("stats", &self.backend.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderhub_core::TenderId;

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn test_typed_roundtrip() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::bid_collection(TenderId::new(1));
        cache.set(&key, &vec![1u32, 2, 3], TTL);
        assert_eq!(cache.get::<Vec<u32>>(&key), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_undecodable_entry_is_miss() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::tender_collection();
        cache.backend().set(&key, b"{not json", TTL).unwrap();
        assert_eq!(cache.get::<Vec<u32>>(&key), None);
    }

    #[test]
    fn test_wrong_shape_is_miss() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::tender_collection();
        cache.set(&key, &"a string", TTL);
        assert_eq!(cache.get::<Vec<u32>>(&key), None);
    }

    #[test]
    fn test_invalidate_all() {
        let cache = CacheLayer::in_memory();
        let keys = vec![
            CacheKey::tender_collection(),
            CacheKey::bid_collection(TenderId::new(1)),
        ];
        for key in &keys {
            cache.set(key, &0u8, TTL);
        }
        cache.invalidate_all(keys.clone());
        for key in &keys {
            assert_eq!(cache.get::<u8>(key), None);
        }
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn test_decode_failure_names_the_key() {
        let key = CacheKey::bid_collection(TenderId::new(3));
        let err = decode::<Vec<u32>>(&key, b"{not json").unwrap_err();
        assert!(matches!(
            err,
            CacheError::Deserialization { ref key, .. } if key == "bids_tender_3"
        ));
    }

    #[test]
    fn test_unencodable_value_is_not_stored() {
        let cache = CacheLayer::in_memory();
        let key = CacheKey::tender_collection();
        let mut value = std::collections::HashMap::new();
        value.insert((1u32, 2u32), 3u32);

        let err = encode(&key, &value).unwrap_err();
        assert!(matches!(err, CacheError::Serialization { ref key, .. } if key == "tenders_cache"));

        cache.set(&key, &value, TTL);
        assert_eq!(cache.stats().entry_count, 0);
    }
}
