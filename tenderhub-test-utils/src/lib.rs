//! TenderHub Test Utilities
//!
//! Centralized test infrastructure for the TenderHub workspace:
//! - Proptest generators for drafts and statuses
//! - Test fixtures for common scenarios
//! - Fault-injecting store and cache wrappers
//! - Custom assertions on error classification

// Re-export the in-memory store from its source crate
pub use tenderhub_storage::MemoryStorage;

// Re-export core types for convenience
pub use tenderhub_core::{
    AccessError, Bid, BidId, ClientId, ContractorId, ErrorKind, NewBid, NewTender, StateError,
    Tender, TenderError, TenderId, TenderResult, TenderStatus, Timestamp, ValidationError,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tenderhub_core::{BidRecord, CacheError, StorageError, TenderRecord, TenderUpdate};
use tenderhub_storage::{
    CacheBackend, CacheKey, CacheResult, CacheStats, DeletedTender, InMemoryCacheBackend,
    StorageTrait, TransitionOutcome,
};

// ============================================================================
// FAULT INJECTION
// ============================================================================

/// Store wrapper that fails every call while switched offline.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    offline: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The wrapped store, reachable even while offline.
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn check(&self) -> TenderResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                reason: "store switched offline".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl StorageTrait for FlakyStorage {
    fn tender_insert(&self, record: TenderRecord) -> TenderResult<Tender> {
        self.check()?;
        self.inner.tender_insert(record)
    }

    fn tender_get(&self, id: TenderId) -> TenderResult<Option<Tender>> {
        self.check()?;
        self.inner.tender_get(id)
    }

    fn tender_list(&self) -> TenderResult<Vec<Tender>> {
        self.check()?;
        self.inner.tender_list()
    }

    fn tender_transition(
        &self,
        id: TenderId,
        expected: TenderStatus,
        update: TenderUpdate,
    ) -> TenderResult<TransitionOutcome> {
        self.check()?;
        self.inner.tender_transition(id, expected, update)
    }

    fn tender_delete(&self, id: TenderId) -> TenderResult<Option<DeletedTender>> {
        self.check()?;
        self.inner.tender_delete(id)
    }

    fn bid_insert(&self, record: BidRecord) -> TenderResult<Bid> {
        self.check()?;
        self.inner.bid_insert(record)
    }

    fn bid_get(&self, id: BidId) -> TenderResult<Option<Bid>> {
        self.check()?;
        self.inner.bid_get(id)
    }

    fn bid_get_for_tender(
        &self,
        bid_id: BidId,
        tender_id: TenderId,
    ) -> TenderResult<Option<Bid>> {
        self.check()?;
        self.inner.bid_get_for_tender(bid_id, tender_id)
    }

    fn bid_list_by_tender(&self, tender_id: TenderId) -> TenderResult<Vec<Bid>> {
        self.check()?;
        self.inner.bid_list_by_tender(tender_id)
    }

    fn bid_list_by_contractor(&self, contractor_id: ContractorId) -> TenderResult<Vec<Bid>> {
        self.check()?;
        self.inner.bid_list_by_contractor(contractor_id)
    }

    fn bid_delete(&self, id: BidId) -> TenderResult<Option<Bid>> {
        self.check()?;
        self.inner.bid_delete(id)
    }
}

/// Cache backend wrapper that fails every call while switched offline.
#[derive(Debug, Default)]
pub struct FlakyCache {
    inner: InMemoryCacheBackend,
    offline: AtomicBool,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The wrapped backend, reachable even while offline.
    pub fn inner(&self) -> &InMemoryCacheBackend {
        &self.inner
    }

    fn check(&self) -> CacheResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "cache switched offline".to_string(),
            });
        }
        Ok(())
    }
}

impl CacheBackend for FlakyCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        self.check()?;
        self.inner.get(key)
    }

    fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.inner.set(key, value, ttl)
    }

    fn delete(&self, key: &CacheKey) -> CacheResult<()> {
        self.check()?;
        self.inner.delete(key)
    }

    fn purge_expired(&self) -> CacheResult<u64> {
        self.check()?;
        self.inner.purge_expired()
    }

    fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for TenderHub inputs.

    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    pub fn arb_tender_status() -> impl Strategy<Value = TenderStatus> {
        prop::sample::select(TenderStatus::ALL.to_vec())
    }

    pub fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,40}"
    }

    pub fn arb_valid_budget() -> impl Strategy<Value = f64> {
        0.01f64..1_000_000.0
    }

    /// Budgets and prices that must be rejected.
    pub fn arb_non_positive_amount() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(0.0),
            Just(-0.0),
            Just(f64::NAN),
            Just(f64::INFINITY),
            -1_000_000.0f64..0.0,
        ]
    }

    pub fn arb_valid_new_tender() -> impl Strategy<Value = NewTender> {
        (arb_title(), ".{0,80}", 1i64..365, arb_valid_budget()).prop_map(
            |(title, description, days, budget)| NewTender {
                title,
                description,
                deadline: Utc::now() + chrono::Duration::days(days),
                budget,
            },
        )
    }

    pub fn arb_valid_new_bid() -> impl Strategy<Value = NewBid> {
        (0.01f64..1_000_000.0, 1i64..720, ".{0,80}").prop_map(|(price, delivery_time, comments)| {
            NewBid {
                price,
                delivery_time,
                comments,
            }
        })
    }

    pub fn arb_non_positive_delivery_time() -> impl Strategy<Value = i64> {
        i64::MIN..=0
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;
    use chrono::Utc;
    use tenderhub_market::{MarketContext, Marketplace};
    use tenderhub_storage::CacheLayer;

    /// A deadline one week out.
    pub fn future_deadline() -> Timestamp {
        Utc::now() + chrono::Duration::days(7)
    }

    /// A deadline one day in the past.
    pub fn past_deadline() -> Timestamp {
        Utc::now() - chrono::Duration::days(1)
    }

    /// `{title: "Build fence", deadline: now + 7d, budget: 500}`
    pub fn sample_new_tender() -> NewTender {
        NewTender {
            title: "Build fence".to_string(),
            description: "Cedar fence around the back garden".to_string(),
            deadline: future_deadline(),
            budget: 500.0,
        }
    }

    /// `{price: 400, delivery_time: 5}`
    pub fn sample_new_bid() -> NewBid {
        NewBid {
            price: 400.0,
            delivery_time: 5,
            comments: "Can start Monday".to_string(),
        }
    }

    /// Marketplace over an in-memory store and cache.
    pub fn market_with_memory() -> Marketplace {
        Marketplace::in_memory()
    }

    /// Marketplace whose store and cache can be switched offline.
    pub struct FlakyMarket {
        pub market: Marketplace,
        pub storage: Arc<FlakyStorage>,
        pub cache: Arc<FlakyCache>,
    }

    pub fn flaky_market() -> FlakyMarket {
        let storage = Arc::new(FlakyStorage::new());
        let cache = Arc::new(FlakyCache::new());
        let ctx = MarketContext::new(
            storage.clone(),
            CacheLayer::new(cache.clone()),
            Default::default(),
        )
        .expect("default config is valid");
        FlakyMarket {
            market: Marketplace::new(ctx),
            storage,
            cache,
        }
    }

    /// Create the sample tender for `client`.
    pub fn open_tender(market: &Marketplace, client: i64) -> Tender {
        market
            .tenders()
            .create_tender(sample_new_tender(), ClientId::new(client))
            .expect("sample tender is valid")
    }

    /// Place the sample bid from `contractor` on `tender_id`.
    pub fn place_bid(market: &Marketplace, tender_id: TenderId, contractor: i64) -> Bid {
        market
            .bids()
            .create_bid(sample_new_bid(), tender_id, ContractorId::new(contractor))
            .expect("sample bid is valid")
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions on error classification.

    use super::*;

    #[track_caller]
    fn assert_kind<T: std::fmt::Debug>(result: &TenderResult<T>, expected: ErrorKind) {
        match result {
            Err(e) if e.kind() == expected => {}
            other => panic!("Expected {:?} error, got: {:?}", expected, other),
        }
    }

    /// Assert that a TenderResult is a validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &TenderResult<T>) {
        assert_kind(result, ErrorKind::Validation);
    }

    /// Assert that a TenderResult is a not-found or access-denied error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &TenderResult<T>) {
        assert_kind(result, ErrorKind::NotFound);
    }

    /// Assert that a TenderResult is a state machine violation.
    #[track_caller]
    pub fn assert_state_conflict<T: std::fmt::Debug>(result: &TenderResult<T>) {
        assert_kind(result, ErrorKind::StateConflict);
    }

    /// Assert that a TenderResult is a storage-class failure.
    #[track_caller]
    pub fn assert_internal<T: std::fmt::Debug>(result: &TenderResult<T>) {
        assert_kind(result, ErrorKind::Internal);
    }
}
