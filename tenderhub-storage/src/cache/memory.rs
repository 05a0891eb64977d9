//! In-process cache backend with per-entry TTL.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tenderhub_core::CacheError;

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheResult, CacheStats};

#[derive(Debug, Clone)]
struct MemoryEntry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// HashMap-backed cache. Expired entries are dropped lazily on read and by
/// [`CacheBackend::purge_expired`].
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, MemoryEntry>>,
    stats: RwLock<CacheStats>,
}

fn poisoned() -> CacheError {
    CacheError::Backend {
        reason: "cache lock poisoned".to_string(),
    }
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }

    fn refresh_size(&self, entries: &HashMap<String, MemoryEntry>) {
        let entry_count = entries.len() as u64;
        let memory_bytes = entries.values().map(|e| e.bytes.len() as u64).sum();
        self.record(|stats| {
            stats.entry_count = entry_count;
            stats.memory_bytes = memory_bytes;
        });
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let encoded = key.encode();
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            match entries.get(&encoded) {
                Some(entry) if !entry.is_expired(now) => {
                    let bytes = entry.bytes.clone();
                    self.record(|stats| stats.hits += 1);
                    return Ok(Some(bytes));
                }
                Some(_) => {}
                None => {
                    self.record(|stats| stats.misses += 1);
                    return Ok(None);
                }
            }
        }

        // Expired: drop it unless a concurrent writer refreshed it meanwhile.
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.get(&encoded).is_some_and(|e| e.is_expired(now)) {
            entries.remove(&encoded);
            self.record(|stats| stats.expirations += 1);
        }
        self.record(|stats| stats.misses += 1);
        self.refresh_size(&entries);
        Ok(None)
    }

    fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(
            key.encode(),
            MemoryEntry {
                bytes: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        self.refresh_size(&entries);
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.remove(&key.encode()).is_some() {
            self.refresh_size(&entries);
        }
        Ok(())
    }

    fn purge_expired(&self) -> CacheResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = (before - entries.len()) as u64;
        self.record(|stats| stats.expirations += purged);
        self.refresh_size(&entries);
        Ok(purged)
    }

    fn stats(&self) -> CacheStats {
        self.stats.read().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderhub_core::{BidId, TenderId};

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn test_set_and_get() {
        let backend = InMemoryCacheBackend::new();
        let key = CacheKey::tender_collection();
        backend.set(&key, b"[]", TTL).unwrap();
        assert_eq!(backend.get(&key).unwrap(), Some(b"[]".to_vec()));

        let stats = backend.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.memory_bytes, 2);
    }

    #[test]
    fn test_get_missing_is_miss() {
        let backend = InMemoryCacheBackend::new();
        assert_eq!(backend.get(&CacheKey::tender_collection()).unwrap(), None);
        assert_eq!(backend.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_miss_and_removed() {
        let backend = InMemoryCacheBackend::new();
        let key = CacheKey::bid_collection(TenderId::new(1));
        backend.set(&key, b"[]", Duration::ZERO).unwrap();

        assert_eq!(backend.get(&key).unwrap(), None);
        let stats = backend.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let backend = InMemoryCacheBackend::new();
        let key = CacheKey::bid(BidId::new(1), TenderId::new(1));
        backend.set(&key, b"{}", TTL).unwrap();
        backend.delete(&key).unwrap();
        backend.delete(&key).unwrap();
        assert_eq!(backend.get(&key).unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let backend = InMemoryCacheBackend::new();
        let key = CacheKey::tender_collection();
        backend.set(&key, b"old", TTL).unwrap();
        backend.set(&key, b"new", TTL).unwrap();
        assert_eq!(backend.get(&key).unwrap(), Some(b"new".to_vec()));
        assert_eq!(backend.stats().entry_count, 1);
    }

    #[test]
    fn test_purge_expired() {
        let backend = InMemoryCacheBackend::new();
        backend
            .set(&CacheKey::bid_collection(TenderId::new(1)), b"[]", Duration::ZERO)
            .unwrap();
        backend
            .set(&CacheKey::bid_collection(TenderId::new(2)), b"[]", Duration::ZERO)
            .unwrap();
        backend.set(&CacheKey::tender_collection(), b"[]", TTL).unwrap();

        assert_eq!(backend.purge_expired().unwrap(), 2);
        assert_eq!(backend.stats().entry_count, 1);
    }
}
