//! Bid lifecycle: submission, lookup, and withdrawal.

use std::sync::Arc;

use tenderhub_core::{
    lifecycle, validate_new_bid, AccessError, Bid, BidId, BidRecord, BidStatus, ContractorId,
    EntityType, NewBid, TenderId, TenderResult,
};
use tenderhub_storage::{load_with_cache, CacheKey};
use tracing::{debug, info};

use crate::context::MarketContext;
use crate::queries::{exists, find_bid_in_tender, not_owner, TenderQueries};

/// Owns all bid mutations. Reads tender state through [`TenderQueries`] only.
#[derive(Clone)]
pub struct BidManager {
    ctx: MarketContext,
    tenders: Arc<dyn TenderQueries>,
}

impl BidManager {
    pub fn new(ctx: MarketContext, tenders: Arc<dyn TenderQueries>) -> Self {
        Self { ctx, tenders }
    }

    /// Submit a bid against an open tender.
    ///
    /// Input is validated before any store access. A missing tender is a not-found
    /// error; a tender that is closed or awarded is a state error.
    pub fn create_bid(
        &self,
        draft: NewBid,
        tender_id: TenderId,
        contractor_id: ContractorId,
    ) -> TenderResult<Bid> {
        validate_new_bid(&draft)?;

        let tender = self.tenders.tender_get(tender_id)?;
        lifecycle::check_accepts_bids(tender_id, tender.status)?;

        let bid = self.ctx.store().bid_insert(BidRecord {
            tender_id,
            contractor_id,
            price: draft.price,
            delivery_time: draft.delivery_time,
            comments: draft.comments,
            status: BidStatus::Pending,
        })?;
        self.ctx.cache().invalidate_all([
            CacheKey::bid_collection(tender_id),
            CacheKey::bid(bid.bid_id, tender_id),
        ]);

        info!(
            bid_id = %bid.bid_id,
            tender_id = %tender_id,
            contractor_id = %contractor_id,
            price = bid.price,
            "Bid created"
        );
        Ok(bid)
    }

    /// A single bid under its tender, served through the cache.
    pub fn get_bid_by_id(&self, bid_id: BidId, tender_id: TenderId) -> TenderResult<Bid> {
        let read = load_with_cache(
            self.ctx.cache(),
            &CacheKey::bid(bid_id, tender_id),
            self.ctx.cache_ttl(),
            || {
                self.ctx
                    .store()
                    .bid_get_for_tender(bid_id, tender_id)?
                    .ok_or_else(|| AccessError::bid_not_found(bid_id).into())
            },
        )?;
        Ok(read.into_value())
    }

    /// All bids on a tender, served through the cache. The tender must exist.
    pub fn get_all_bids(&self, tender_id: TenderId) -> TenderResult<Vec<Bid>> {
        self.tenders.tender_get(tender_id)?;
        let read = load_with_cache(
            self.ctx.cache(),
            &CacheKey::bid_collection(tender_id),
            self.ctx.cache_ttl(),
            || self.ctx.store().bid_list_by_tender(tender_id),
        )?;
        Ok(read.into_value())
    }

    /// Bids submitted by a contractor, read straight from the store.
    pub fn get_contractor_bids(&self, contractor_id: ContractorId) -> TenderResult<Vec<Bid>> {
        self.ctx.store().bid_list_by_contractor(contractor_id)
    }

    /// Withdraw a bid. Only the submitting contractor may delete it.
    pub fn delete_bid(&self, bid_id: BidId, contractor_id: ContractorId) -> TenderResult<Bid> {
        let bid = self
            .ctx
            .store()
            .bid_get(bid_id)?
            .ok_or_else(|| AccessError::bid_not_found(bid_id))?;
        if !bid.is_submitted_by(contractor_id) {
            debug!(bid_id = %bid_id, contractor_id = %contractor_id, "Bid access denied");
            return Err(
                not_owner(EntityType::Bid, bid_id.as_i64(), contractor_id.as_i64()).into(),
            );
        }

        let deleted = self
            .ctx
            .store()
            .bid_delete(bid_id)?
            .ok_or_else(|| AccessError::bid_not_found(bid_id))?;
        self.ctx.cache().invalidate_all([
            CacheKey::bid_collection(deleted.tender_id),
            CacheKey::bid(bid_id, deleted.tender_id),
        ]);

        info!(
            bid_id = %bid_id,
            tender_id = %deleted.tender_id,
            contractor_id = %contractor_id,
            "Bid deleted"
        );
        Ok(deleted)
    }

    /// Whether `bid_id` exists and belongs to `tender_id`.
    pub fn is_bid_exists(&self, bid_id: BidId, tender_id: TenderId) -> TenderResult<bool> {
        exists(find_bid_in_tender(self.ctx.store(), bid_id, tender_id))
    }
}

impl std::fmt::Debug for BidManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidManager")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}
