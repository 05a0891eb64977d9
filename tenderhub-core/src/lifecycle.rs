//! Tender state machine rules.
//!
//! Pure checks over [`TenderStatus`]. Managers call these before writing, and the store
//! repeats the `status = open` guard atomically at write time.

use crate::{StateError, TenderId, TenderStatus};

/// Check a generic status update.
///
/// The current status is checked first: a tender that is not open rejects every update,
/// whatever the requested target. `Awarded` is never reachable through this path.
pub fn check_update(
    tender_id: TenderId,
    current: TenderStatus,
    requested: TenderStatus,
) -> Result<(), StateError> {
    if current != TenderStatus::Open {
        return Err(StateError::UpdateNotAllowed {
            tender_id,
            status: current,
        });
    }
    if requested == TenderStatus::Awarded {
        return Err(StateError::AwardViaUpdate { tender_id });
    }
    Ok(())
}

/// Check that a tender can be awarded.
pub fn check_award(tender_id: TenderId, current: TenderStatus) -> Result<(), StateError> {
    if current != TenderStatus::Open {
        return Err(StateError::NotAwardable {
            tender_id,
            status: current,
        });
    }
    Ok(())
}

/// Check that a tender accepts new bids.
pub fn check_accepts_bids(tender_id: TenderId, current: TenderStatus) -> Result<(), StateError> {
    if !current.accepts_bids() {
        return Err(StateError::NotOpenForBids {
            tender_id,
            status: current,
        });
    }
    Ok(())
}
