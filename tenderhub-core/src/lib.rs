//! TenderHub Core - Entity Types and Tender State Machine
//!
//! Pure data structures, the error taxonomy, and the rules that govern tender status
//! transitions. All other crates depend on this one. Nothing here touches the store or
//! the cache.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod validation;

pub use config::{MarketConfig, DEFAULT_CACHE_TTL};
pub use entities::{Bid, BidRecord, NewBid, NewTender, Tender, TenderRecord, TenderUpdate};
pub use enums::{
    BidStatus, BidStatusParseError, EntityType, TenderStatus, TenderStatusParseError,
};
pub use error::{
    AccessError, CacheError, ConfigError, ErrorKind, StateError, StorageError, TenderError,
    TenderResult, ValidationError,
};
pub use identity::{BidId, ClientId, ContractorId, IdParseError, TenderId, Timestamp};
pub use validation::{validate_new_bid, validate_new_tender};
