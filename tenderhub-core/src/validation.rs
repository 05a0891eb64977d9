//! Input validation for creation requests.

use crate::{NewBid, NewTender, Timestamp, ValidationError};

/// Validate a tender draft against the current time.
pub fn validate_new_tender(draft: &NewTender, now: Timestamp) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "title".to_string(),
        });
    }
    if draft.deadline <= now {
        return Err(ValidationError::invalid("deadline", "must be in the future"));
    }
    if !draft.budget.is_finite() || draft.budget <= 0.0 {
        return Err(ValidationError::invalid("budget", "must be positive"));
    }
    Ok(())
}

/// Validate a bid draft.
pub fn validate_new_bid(draft: &NewBid) -> Result<(), ValidationError> {
    if !draft.price.is_finite() || draft.price <= 0.0 {
        return Err(ValidationError::invalid("price", "must be positive"));
    }
    if draft.delivery_time <= 0 {
        return Err(ValidationError::invalid("delivery_time", "must be positive"));
    }
    Ok(())
}
