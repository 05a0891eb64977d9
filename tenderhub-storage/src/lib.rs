//! TenderHub Storage - Store Trait, In-Memory Store, and Cache Layer
//!
//! Defines the storage abstraction the lifecycle managers write through. The store is
//! the single source of truth; the [`cache`] module is a disposable accelerator in front
//! of it.

pub mod cache;

pub use cache::{
    load_with_cache, CacheBackend, CacheKey, CacheLayer, CacheRead, CacheResult, CacheStats,
    InMemoryCacheBackend, LmdbCacheBackend, LmdbCacheError,
};

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tenderhub_core::{
    Bid, BidId, BidRecord, ContractorId, EntityType, StorageError, Tender, TenderId,
    TenderRecord, TenderResult, TenderStatus, TenderUpdate,
};

// ============================================================================
// OPERATION RESULTS
// ============================================================================

/// Result of a conditional tender write.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The guard held and the update was applied.
    Applied(Tender),
    /// The tender exists but its status no longer matched the expected one.
    StatusMismatch(TenderStatus),
    /// The tender does not exist.
    Missing,
}

/// A tender removed together with the bids that referenced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedTender {
    pub tender: Tender,
    pub bids: Vec<Bid>,
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for TenderHub entities.
///
/// Implementations behave like a relational store: ids are assigned on insert, bids
/// carry a foreign key to their tender with cascading delete, and
/// [`StorageTrait::tender_transition`] is a single atomic `UPDATE ... WHERE status = ?`.
pub trait StorageTrait: Send + Sync {
    // === Tender Operations ===

    /// Insert a new tender and return it with its assigned id.
    fn tender_insert(&self, record: TenderRecord) -> TenderResult<Tender>;

    /// Get a tender by ID.
    fn tender_get(&self, id: TenderId) -> TenderResult<Option<Tender>>;

    /// List all tenders ordered by id.
    fn tender_list(&self) -> TenderResult<Vec<Tender>>;

    /// Apply `update` only if the tender's status still equals `expected`.
    fn tender_transition(
        &self,
        id: TenderId,
        expected: TenderStatus,
        update: TenderUpdate,
    ) -> TenderResult<TransitionOutcome>;

    /// Delete a tender and all of its bids.
    fn tender_delete(&self, id: TenderId) -> TenderResult<Option<DeletedTender>>;

    // === Bid Operations ===

    /// Insert a new bid. Fails if the referenced tender does not exist.
    fn bid_insert(&self, record: BidRecord) -> TenderResult<Bid>;

    /// Get a bid by ID.
    fn bid_get(&self, id: BidId) -> TenderResult<Option<Bid>>;

    /// Get a bid by ID, only if it belongs to the given tender.
    fn bid_get_for_tender(&self, bid_id: BidId, tender_id: TenderId)
        -> TenderResult<Option<Bid>>;

    /// List bids placed against a tender.
    fn bid_list_by_tender(&self, tender_id: TenderId) -> TenderResult<Vec<Bid>>;

    /// List bids submitted by a contractor.
    fn bid_list_by_contractor(&self, contractor_id: ContractorId) -> TenderResult<Vec<Bid>>;

    /// Delete a bid, returning it if it existed.
    fn bid_delete(&self, id: BidId) -> TenderResult<Option<Bid>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct MemoryTables {
    tenders: BTreeMap<TenderId, Tender>,
    bids: BTreeMap<BidId, Bid>,
    last_tender_id: i64,
    last_bid_id: i64,
}

/// In-memory store for development and testing.
///
/// Both tables live behind one lock so that cascade deletes and conditional writes are
/// atomic with respect to every other operation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TenderResult<RwLockReadGuard<'_, MemoryTables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::LockPoisoned.into())
    }

    fn write(&self) -> TenderResult<RwLockWriteGuard<'_, MemoryTables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::LockPoisoned.into())
    }

    /// Remove every row and reset the id sequences.
    pub fn clear(&self) -> TenderResult<()> {
        *self.write()? = MemoryTables::default();
        Ok(())
    }

    /// Number of stored tenders.
    pub fn tender_count(&self) -> TenderResult<usize> {
        Ok(self.read()?.tenders.len())
    }

    /// Number of stored bids.
    pub fn bid_count(&self) -> TenderResult<usize> {
        Ok(self.read()?.bids.len())
    }
}

impl StorageTrait for MemoryStorage {
    // === Tender Operations ===

    fn tender_insert(&self, record: TenderRecord) -> TenderResult<Tender> {
        let mut tables = self.write()?;
        tables.last_tender_id += 1;
        let now = Utc::now();
        let tender = Tender {
            tender_id: TenderId::new(tables.last_tender_id),
            client_id: record.client_id,
            title: record.title,
            description: record.description,
            deadline: record.deadline,
            budget: record.budget,
            status: record.status,
            awarded_bid_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.tenders.insert(tender.tender_id, tender.clone());
        Ok(tender)
    }

    fn tender_get(&self, id: TenderId) -> TenderResult<Option<Tender>> {
        Ok(self.read()?.tenders.get(&id).cloned())
    }

    fn tender_list(&self) -> TenderResult<Vec<Tender>> {
        Ok(self.read()?.tenders.values().cloned().collect())
    }

    fn tender_transition(
        &self,
        id: TenderId,
        expected: TenderStatus,
        update: TenderUpdate,
    ) -> TenderResult<TransitionOutcome> {
        let mut tables = self.write()?;
        let Some(tender) = tables.tenders.get_mut(&id) else {
            return Ok(TransitionOutcome::Missing);
        };
        if tender.status != expected {
            return Ok(TransitionOutcome::StatusMismatch(tender.status));
        }

        if let Some(status) = update.status {
            tender.status = status;
        }
        if let Some(bid_id) = update.awarded_bid_id {
            tender.awarded_bid_id = Some(bid_id);
        }
        tender.updated_at = Utc::now();

        Ok(TransitionOutcome::Applied(tender.clone()))
    }

    fn tender_delete(&self, id: TenderId) -> TenderResult<Option<DeletedTender>> {
        let mut tables = self.write()?;
        let Some(tender) = tables.tenders.remove(&id) else {
            return Ok(None);
        };
        let bid_ids: Vec<BidId> = tables
            .bids
            .values()
            .filter(|b| b.tender_id == id)
            .map(|b| b.bid_id)
            .collect();
        let bids = bid_ids
            .iter()
            .filter_map(|bid_id| tables.bids.remove(bid_id))
            .collect();
        Ok(Some(DeletedTender { tender, bids }))
    }

    // === Bid Operations ===

    fn bid_insert(&self, record: BidRecord) -> TenderResult<Bid> {
        let mut tables = self.write()?;
        if !tables.tenders.contains_key(&record.tender_id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Bid,
                reason: format!(
                    "foreign key violation: tender {} does not exist",
                    record.tender_id
                ),
            }
            .into());
        }
        tables.last_bid_id += 1;
        let bid = Bid {
            bid_id: BidId::new(tables.last_bid_id),
            tender_id: record.tender_id,
            contractor_id: record.contractor_id,
            price: record.price,
            delivery_time: record.delivery_time,
            comments: record.comments,
            status: record.status,
            created_at: Utc::now(),
        };
        tables.bids.insert(bid.bid_id, bid.clone());
        Ok(bid)
    }

    fn bid_get(&self, id: BidId) -> TenderResult<Option<Bid>> {
        Ok(self.read()?.bids.get(&id).cloned())
    }

    fn bid_get_for_tender(
        &self,
        bid_id: BidId,
        tender_id: TenderId,
    ) -> TenderResult<Option<Bid>> {
        Ok(self
            .read()?
            .bids
            .get(&bid_id)
            .filter(|b| b.tender_id == tender_id)
            .cloned())
    }

    fn bid_list_by_tender(&self, tender_id: TenderId) -> TenderResult<Vec<Bid>> {
        Ok(self
            .read()?
            .bids
            .values()
            .filter(|b| b.tender_id == tender_id)
            .cloned()
            .collect())
    }

    fn bid_list_by_contractor(&self, contractor_id: ContractorId) -> TenderResult<Vec<Bid>> {
        Ok(self
            .read()?
            .bids
            .values()
            .filter(|b| b.contractor_id == contractor_id)
            .cloned()
            .collect())
    }

    fn bid_delete(&self, id: BidId) -> TenderResult<Option<Bid>> {
        Ok(self.write()?.bids.remove(&id))
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use tenderhub_core::{BidStatus, ClientId};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Lookups for ids that were never assigned return Ok(None), not an error.
        #[test]
        fn prop_unknown_ids_return_none(raw in 1i64..10_000) {
            let storage = MemoryStorage::new();
            prop_assert!(storage.tender_get(TenderId::new(raw)).unwrap().is_none());
            prop_assert!(storage.bid_get(BidId::new(raw)).unwrap().is_none());
        }

        /// Deleting a tender leaves no bid that references it.
        #[test]
        fn prop_cascade_leaves_no_orphans(bids_per_tender in prop::collection::vec(0usize..5, 1..5)) {
            let storage = MemoryStorage::new();
            let mut tender_ids = Vec::new();
            for count in &bids_per_tender {
                let tender = storage.tender_insert(TenderRecord {
                    client_id: ClientId::new(1),
                    title: "t".to_string(),
                    description: String::new(),
                    deadline: Utc::now() + Duration::days(1),
                    budget: 1.0,
                    status: TenderStatus::Open,
                }).unwrap();
                for n in 0..*count {
                    storage.bid_insert(BidRecord {
                        tender_id: tender.tender_id,
                        contractor_id: ContractorId::new(n as i64 + 10),
                        price: 1.0,
                        delivery_time: 1,
                        comments: String::new(),
                        status: BidStatus::Pending,
                    }).unwrap();
                }
                tender_ids.push(tender.tender_id);
            }

            let victim = tender_ids[0];
            let deleted = storage.tender_delete(victim).unwrap().unwrap();
            prop_assert_eq!(deleted.bids.len(), bids_per_tender[0]);
            prop_assert!(storage.bid_list_by_tender(victim).unwrap().is_empty());

            let remaining: usize = bids_per_tender[1..].iter().sum();
            prop_assert_eq!(storage.bid_count().unwrap(), remaining);
        }
    }
}
