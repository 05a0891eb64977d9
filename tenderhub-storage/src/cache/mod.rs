//! Cache-aside layer for tender and bid reads.
//!
//! The cache is never authoritative. Managers consult it before the store through
//! [`load_with_cache`], and invalidate the affected [`CacheKey`]s right after every
//! committed write. Backend faults never surface to callers: [`CacheLayer`] logs them
//! and degrades to store reads.
//!
//! # Example
//!
//! ```ignore
//! let cache = CacheLayer::in_memory();
//! let key = CacheKey::tender_collection();
//!
//! let read = load_with_cache(&cache, &key, ttl, || storage.tender_list())?;
//! if read.was_cache_miss() {
//!     tracing::debug!("populated {key}");
//! }
//!
//! // after a write commits
//! cache.invalidate(&key);
//! ```

pub mod key;
pub mod layer;
pub mod lmdb_backend;
pub mod memory;
pub mod read_through;
pub mod traits;

pub use key::CacheKey;
pub use layer::CacheLayer;
pub use lmdb_backend::{LmdbCacheBackend, LmdbCacheError};
pub use memory::InMemoryCacheBackend;
pub use read_through::{load_with_cache, CacheRead};
pub use traits::{CacheBackend, CacheResult, CacheStats};
