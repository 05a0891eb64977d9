//! LMDB-backed cache implementation.
//!
//! Uses the heed crate (Rust bindings for LMDB) to provide a memory-mapped cache that
//! survives process restarts. Keys are the encoded [`CacheKey`] strings.
//!
//! # Value Format
//!
//! `[expires_at: 8 bytes, i64 LE unix millis][payload]`
//!
//! Entries past their expiry are reported as misses and deleted on the read that
//! finds them.

use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tenderhub_core::CacheError;

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheResult, CacheStats};

const HEADER_LEN: usize = 8;

/// Error type for LMDB cache operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbCacheError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Stored value is shorter than its header.
    #[error("Corrupt entry for {0}")]
    CorruptEntry(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbCacheError> for CacheError {
    fn from(e: LmdbCacheError) -> Self {
        match e {
            LmdbCacheError::EnvOpen(_) | LmdbCacheError::DbOpen(_) | LmdbCacheError::Io(_) => {
                CacheError::Unavailable {
                    reason: e.to_string(),
                }
            }
            LmdbCacheError::Transaction(_) | LmdbCacheError::CorruptEntry(_) => {
                CacheError::Backend {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn txn_err(e: heed::Error) -> LmdbCacheError {
    LmdbCacheError::Transaction(e.to_string())
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Split a stored value into its expiry and payload.
fn split_entry(encoded_key: &str, bytes: &[u8]) -> Result<(i64, Vec<u8>), LmdbCacheError> {
    if bytes.len() < HEADER_LEN {
        return Err(LmdbCacheError::CorruptEntry(encoded_key.to_string()));
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&bytes[..HEADER_LEN]);
    Ok((i64::from_le_bytes(header), bytes[HEADER_LEN..].to_vec()))
}

/// LMDB-backed cache.
///
/// # Example
///
/// ```ignore
/// use tenderhub_storage::cache::{CacheBackend, CacheKey, LmdbCacheBackend};
/// use std::time::Duration;
///
/// let backend = LmdbCacheBackend::new("/tmp/tenderhub-cache", 64)?;
/// let key = CacheKey::tender_collection();
/// backend.set(&key, b"[]", Duration::from_secs(600))?;
/// assert!(backend.get(&key)?.is_some());
/// ```
pub struct LmdbCacheBackend {
    /// The LMDB environment.
    env: Env,
    /// The main database (single unnamed database).
    db: Database<Bytes, Bytes>,
    stats: RwLock<CacheStats>,
}

impl LmdbCacheBackend {
    /// Create a new LMDB cache backend.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - LMDB environment cannot be opened
    /// - Database cannot be created
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbCacheError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per path by this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbCacheError::EnvOpen(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(txn_err)?;
        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbCacheError::DbOpen(e.to_string()))?;
        wtxn.commit().map_err(txn_err)?;

        let backend = Self {
            env,
            db,
            stats: RwLock::new(CacheStats::default()),
        };
        backend.refresh_entry_count()?;
        Ok(backend)
    }

    /// Drop every entry, returning how many were removed.
    ///
    /// Hit, miss, and expiration counters are kept.
    pub fn clear(&self) -> Result<u64, LmdbCacheError> {
        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let removed = self.db.len(&wtxn).map_err(txn_err)?;
        self.db.clear(&mut wtxn).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        self.record(|stats| {
            stats.entry_count = 0;
            stats.memory_bytes = 0;
        });
        Ok(removed)
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }

    fn refresh_entry_count(&self) -> Result<(), LmdbCacheError> {
        let rtxn = self.env.read_txn().map_err(txn_err)?;
        let count = self.db.len(&rtxn).map_err(txn_err)?;
        self.record(|stats| stats.entry_count = count);
        Ok(())
    }

    fn read_raw(&self, encoded_key: &str) -> Result<Option<Vec<u8>>, LmdbCacheError> {
        let rtxn = self.env.read_txn().map_err(txn_err)?;
        let value = self
            .db
            .get(&rtxn, encoded_key.as_bytes())
            .map_err(txn_err)?
            .map(|bytes| bytes.to_vec());
        Ok(value)
    }

    /// Delete `encoded_key` if it is still expired at `now`.
    fn drop_expired(&self, encoded_key: &str, now: i64) -> Result<bool, LmdbCacheError> {
        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let still_expired = match self
            .db
            .get(&wtxn, encoded_key.as_bytes())
            .map_err(txn_err)?
        {
            Some(bytes) => split_entry(encoded_key, bytes)
                .map(|(expires_at, _)| expires_at <= now)
                .unwrap_or(true),
            None => false,
        };
        let deleted = still_expired
            && self
                .db
                .delete(&mut wtxn, encoded_key.as_bytes())
                .map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;
        Ok(deleted)
    }

    fn get_inner(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, LmdbCacheError> {
        let encoded_key = key.encode();
        let Some(raw) = self.read_raw(&encoded_key)? else {
            self.record(|stats| stats.misses += 1);
            return Ok(None);
        };

        let now = now_millis();
        let (expires_at, payload) = split_entry(&encoded_key, &raw)?;
        if expires_at > now {
            self.record(|stats| stats.hits += 1);
            return Ok(Some(payload));
        }

        if self.drop_expired(&encoded_key, now)? {
            self.record(|stats| {
                stats.expirations += 1;
                stats.entry_count = stats.entry_count.saturating_sub(1);
                stats.memory_bytes = stats.memory_bytes.saturating_sub(raw.len() as u64);
            });
        }
        self.record(|stats| stats.misses += 1);
        Ok(None)
    }

    fn set_inner(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), LmdbCacheError> {
        let encoded_key = key.encode();
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_millis().saturating_add(ttl_millis);

        let mut full_bytes = Vec::with_capacity(HEADER_LEN + value.len());
        full_bytes.extend_from_slice(&expires_at.to_le_bytes());
        full_bytes.extend_from_slice(value);

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let previous_len = self
            .db
            .get(&wtxn, encoded_key.as_bytes())
            .map_err(txn_err)?
            .map(|bytes| bytes.len() as u64);
        self.db
            .put(&mut wtxn, encoded_key.as_bytes(), &full_bytes)
            .map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        self.record(|stats| {
            match previous_len {
                Some(len) => stats.memory_bytes = stats.memory_bytes.saturating_sub(len),
                None => stats.entry_count += 1,
            }
            stats.memory_bytes += full_bytes.len() as u64;
        });
        Ok(())
    }

    fn delete_inner(&self, key: &CacheKey) -> Result<(), LmdbCacheError> {
        let encoded_key = key.encode();
        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let previous_len = self
            .db
            .get(&wtxn, encoded_key.as_bytes())
            .map_err(txn_err)?
            .map(|bytes| bytes.len() as u64);
        let deleted = self
            .db
            .delete(&mut wtxn, encoded_key.as_bytes())
            .map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        if deleted {
            self.record(|stats| {
                stats.entry_count = stats.entry_count.saturating_sub(1);
                stats.memory_bytes = stats
                    .memory_bytes
                    .saturating_sub(previous_len.unwrap_or(0));
            });
        }
        Ok(())
    }

    fn purge_inner(&self) -> Result<u64, LmdbCacheError> {
        let now = now_millis();
        let expired: Vec<Vec<u8>> = {
            let rtxn = self.env.read_txn().map_err(txn_err)?;
            let iter = self.db.iter(&rtxn).map_err(txn_err)?;
            let mut keys = Vec::new();
            for result in iter {
                let (key, value) = result.map_err(txn_err)?;
                let is_expired = value.len() < HEADER_LEN || {
                    let mut header = [0u8; HEADER_LEN];
                    header.copy_from_slice(&value[..HEADER_LEN]);
                    i64::from_le_bytes(header) <= now
                };
                if is_expired {
                    keys.push(key.to_vec());
                }
            }
            keys
        };

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let mut purged = 0u64;
        for key in &expired {
            if self.db.delete(&mut wtxn, key).map_err(txn_err)? {
                purged += 1;
            }
        }
        wtxn.commit().map_err(txn_err)?;

        self.record(|stats| stats.expirations += purged);
        self.refresh_entry_count()?;
        Ok(purged)
    }
}

impl CacheBackend for LmdbCacheBackend {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.get_inner(key)?)
    }

    fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> CacheResult<()> {
        Ok(self.set_inner(key, value, ttl)?)
    }

    fn delete(&self, key: &CacheKey) -> CacheResult<()> {
        Ok(self.delete_inner(key)?)
    }

    fn purge_expired(&self) -> CacheResult<u64> {
        Ok(self.purge_inner()?)
    }

    fn stats(&self) -> CacheStats {
        self.stats.read().map(|s| s.clone()).unwrap_or_default()
    }
}
