//! Tender lifecycle: creation, status updates, deletion, and award.
//!
//! Every write follows the same order: check ownership, check the state machine, write
//! to the store, then invalidate the cache keys that could serve the old view. The store
//! write for updates and awards is conditional on the tender still being open, so a
//! concurrent award or close cannot be overwritten.

use chrono::Utc;
use tenderhub_core::{
    lifecycle, validate_new_tender, AccessError, BidId, ClientId, EntityType, NewTender,
    StateError, Tender, TenderId, TenderRecord, TenderResult, TenderStatus, TenderUpdate,
};
use tenderhub_storage::{load_with_cache, CacheKey, DeletedTender, TransitionOutcome};
use tracing::{debug, info};

use crate::context::MarketContext;
use crate::queries::{exists, find_bid_in_tender, not_owner, TenderQueries};

/// Owns all tender mutations.
#[derive(Debug, Clone)]
pub struct TenderManager {
    ctx: MarketContext,
}

impl TenderManager {
    pub fn new(ctx: MarketContext) -> Self {
        Self { ctx }
    }

    /// Create a tender owned by `client_id`. New tenders always start open.
    pub fn create_tender(&self, draft: NewTender, client_id: ClientId) -> TenderResult<Tender> {
        validate_new_tender(&draft, Utc::now())?;

        let tender = self.ctx.store().tender_insert(TenderRecord {
            client_id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            deadline: draft.deadline,
            budget: draft.budget,
            status: TenderStatus::Open,
        })?;
        self.ctx.cache().invalidate(&CacheKey::tender_collection());

        info!(
            tender_id = %tender.tender_id,
            client_id = %client_id,
            budget = tender.budget,
            "Tender created"
        );
        Ok(tender)
    }

    /// Point lookup, uncached.
    pub fn get_tender_by_id(&self, tender_id: TenderId) -> TenderResult<Tender> {
        self.tender_get(tender_id)
    }

    /// All tenders, served through the cache.
    pub fn get_tenders(&self) -> TenderResult<Vec<Tender>> {
        let read = load_with_cache(
            self.ctx.cache(),
            &CacheKey::tender_collection(),
            self.ctx.cache_ttl(),
            || self.ctx.store().tender_list(),
        )?;
        Ok(read.into_value())
    }

    /// Change the status of an open tender.
    ///
    /// Rejected if the tender is not open (checked first, whatever the target) or if the
    /// target is `awarded`, which only [`TenderManager::award_tender`] may set.
    pub fn update_tender(
        &self,
        tender_id: TenderId,
        client_id: ClientId,
        new_status: TenderStatus,
    ) -> TenderResult<Tender> {
        let tender = self.owned_tender(tender_id, client_id)?;
        lifecycle::check_update(tender_id, tender.status, new_status)?;

        let updated = match self.ctx.store().tender_transition(
            tender_id,
            TenderStatus::Open,
            TenderUpdate::status(new_status),
        )? {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::StatusMismatch(status) => {
                return Err(StateError::UpdateNotAllowed { tender_id, status }.into());
            }
            TransitionOutcome::Missing => {
                return Err(AccessError::tender_not_found(tender_id).into());
            }
        };
        self.ctx.cache().invalidate(&CacheKey::tender_collection());

        info!(
            tender_id = %tender_id,
            from = %tender.status,
            to = %updated.status,
            "Tender status updated"
        );
        Ok(updated)
    }

    /// Delete a tender and its bids. Allowed in any status, for the owner only.
    pub fn delete_tender(&self, tender_id: TenderId, client_id: ClientId) -> TenderResult<Tender> {
        self.owned_tender(tender_id, client_id)?;

        let DeletedTender { tender, bids } = self
            .ctx
            .store()
            .tender_delete(tender_id)?
            .ok_or_else(|| AccessError::tender_not_found(tender_id))?;

        let cache = self.ctx.cache();
        cache.invalidate(&CacheKey::tender_collection());
        cache.invalidate(&CacheKey::bid_collection(tender_id));
        cache.invalidate_all(bids.iter().map(|b| CacheKey::bid(b.bid_id, tender_id)));

        info!(
            tender_id = %tender_id,
            client_id = %client_id,
            removed_bids = bids.len(),
            "Tender deleted"
        );
        Ok(tender)
    }

    /// Award an open tender to one of its bids.
    ///
    /// Status and awarded bid are written together in one conditional update, so a
    /// tender is awarded at most once.
    pub fn award_tender(
        &self,
        tender_id: TenderId,
        client_id: ClientId,
        bid_id: BidId,
    ) -> TenderResult<Tender> {
        let tender = self.owned_tender(tender_id, client_id)?;
        find_bid_in_tender(self.ctx.store(), bid_id, tender_id)?;
        lifecycle::check_award(tender_id, tender.status)?;

        let awarded = match self.ctx.store().tender_transition(
            tender_id,
            TenderStatus::Open,
            TenderUpdate::award(bid_id),
        )? {
            TransitionOutcome::Applied(awarded) => awarded,
            TransitionOutcome::StatusMismatch(status) => {
                return Err(StateError::NotAwardable { tender_id, status }.into());
            }
            TransitionOutcome::Missing => {
                return Err(AccessError::tender_not_found(tender_id).into());
            }
        };
        self.ctx.cache().invalidate(&CacheKey::tender_collection());

        info!(tender_id = %tender_id, bid_id = %bid_id, "Tender awarded");
        Ok(awarded)
    }

    /// Whether a tender exists.
    pub fn is_tender_exists(&self, tender_id: TenderId) -> TenderResult<bool> {
        self.tender_exists(tender_id)
    }
}

impl TenderQueries for TenderManager {
    fn tender_get(&self, tender_id: TenderId) -> TenderResult<Tender> {
        self.ctx
            .store()
            .tender_get(tender_id)?
            .ok_or_else(|| AccessError::tender_not_found(tender_id).into())
    }

    fn tender_exists(&self, tender_id: TenderId) -> TenderResult<bool> {
        exists(self.tender_get(tender_id))
    }

    fn owned_tender(&self, tender_id: TenderId, client_id: ClientId) -> TenderResult<Tender> {
        let tender = self.tender_get(tender_id)?;
        if !tender.is_owned_by(client_id) {
            debug!(
                tender_id = %tender_id,
                client_id = %client_id,
                "Tender access denied"
            );
            return Err(not_owner(
                EntityType::Tender,
                tender_id.as_i64(),
                client_id.as_i64(),
            )
            .into());
        }
        Ok(tender)
    }
}
