//! Read-only tender lookups shared across managers.

use tenderhub_core::{
    AccessError, Bid, BidId, ClientId, EntityType, Tender, TenderId, TenderResult,
};
use tenderhub_storage::StorageTrait;

/// Tender lookups the bid manager is allowed to make.
///
/// The bid side needs to know whether a tender exists and what state it is in, but must
/// never be able to mutate one. Handing it this trait instead of the
/// [`TenderManager`](crate::TenderManager) keeps the dependency one-way.
pub trait TenderQueries: Send + Sync {
    /// Get a tender by id. A missing tender is an [`AccessError::NotFound`].
    fn tender_get(&self, tender_id: TenderId) -> TenderResult<Tender>;

    /// Whether a tender exists. Store faults are returned, not folded into `false`.
    fn tender_exists(&self, tender_id: TenderId) -> TenderResult<bool>;

    /// Get a tender only if `client_id` owns it.
    fn owned_tender(&self, tender_id: TenderId, client_id: ClientId) -> TenderResult<Tender>;
}

/// Load a bid and confirm it was placed against `tender_id`.
///
/// A missing bid and a bid under another tender both fail with an [`AccessError`];
/// the variants differ so logs can tell them apart.
pub(crate) fn find_bid_in_tender(
    store: &dyn StorageTrait,
    bid_id: BidId,
    tender_id: TenderId,
) -> TenderResult<Bid> {
    let bid = store
        .bid_get(bid_id)?
        .ok_or_else(|| AccessError::bid_not_found(bid_id))?;
    if bid.tender_id != tender_id {
        return Err(AccessError::WrongParent {
            bid_id,
            tender_id,
            actual_tender_id: bid.tender_id,
        }
        .into());
    }
    Ok(bid)
}

/// Convert a lookup result into an existence answer, keeping real faults as errors.
pub(crate) fn exists<T>(lookup: TenderResult<T>) -> TenderResult<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

pub(crate) fn not_owner(entity_type: EntityType, id: i64, actor_id: i64) -> AccessError {
    AccessError::NotOwner {
        entity_type,
        id,
        actor_id,
    }
}
