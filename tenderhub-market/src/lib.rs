//! TenderHub Market - Tender and Bid Lifecycle Managers
//!
//! The [`TenderManager`] owns the tender state machine and the award workflow. The
//! [`BidManager`] owns bids and consults tenders through the read-only
//! [`TenderQueries`] capability. Both read through the cache and invalidate it after
//! every committed write.
//!
//! All operations are synchronous; callers on an async runtime should run them on a
//! blocking pool.

pub mod bid;
pub mod context;
pub mod marketplace;
pub mod queries;
pub mod tender;

pub use bid::BidManager;
pub use context::MarketContext;
pub use marketplace::Marketplace;
pub use queries::TenderQueries;
pub use tender::TenderManager;
