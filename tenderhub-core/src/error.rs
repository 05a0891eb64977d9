//! Error types for TenderHub operations

use crate::{BidId, EntityType, TenderId, TenderStatus};
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Insert failed for {entity_type:?}: {reason}")]
    InsertFailed { entity_type: EntityType, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Input validation errors. Raised before any store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &str, reason: &str) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Lookup failures that callers outside the core must not be able to tell apart.
///
/// The variants keep the real cause for logs and tests. Every variant renders the same
/// [`AccessError::public_message`] so a non-owner learns nothing about existence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: EntityType, id: i64 },

    #[error("{entity_type} {id} is not owned by actor {actor_id}")]
    NotOwner {
        entity_type: EntityType,
        id: i64,
        actor_id: i64,
    },

    #[error("Bid {bid_id} belongs to tender {actual_tender_id}, not tender {tender_id}")]
    WrongParent {
        bid_id: BidId,
        tender_id: TenderId,
        actual_tender_id: TenderId,
    },
}

impl AccessError {
    pub fn tender_not_found(tender_id: TenderId) -> Self {
        AccessError::NotFound {
            entity_type: EntityType::Tender,
            id: tender_id.as_i64(),
        }
    }

    pub fn bid_not_found(bid_id: BidId) -> Self {
        AccessError::NotFound {
            entity_type: EntityType::Bid,
            id: bid_id.as_i64(),
        }
    }

    /// Entity the failed lookup was for.
    pub fn entity_type(&self) -> EntityType {
        match self {
            AccessError::NotFound { entity_type, .. } => *entity_type,
            AccessError::NotOwner { entity_type, .. } => *entity_type,
            AccessError::WrongParent { .. } => EntityType::Bid,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        format!("{} not found or access denied", self.entity_type())
    }
}

/// Tender state machine violations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Tender {tender_id} is {status}; only open tenders can be updated")]
    UpdateNotAllowed {
        tender_id: TenderId,
        status: TenderStatus,
    },

    #[error("Tender {tender_id} cannot be awarded through a status update")]
    AwardViaUpdate { tender_id: TenderId },

    #[error("Tender {tender_id} is {status} and not open for bids")]
    NotOpenForBids {
        tender_id: TenderId,
        status: TenderStatus,
    },

    #[error("Tender {tender_id} is {status} and cannot be awarded")]
    NotAwardable {
        tender_id: TenderId,
        status: TenderStatus,
    },
}

/// Cache backend errors. The lifecycle layer logs and drops these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Cache backend error: {reason}")]
    Backend { reason: String },

    #[error("Failed to serialize cache entry {key}: {reason}")]
    Serialization { key: String, reason: String },

    #[error("Failed to deserialize cache entry {key}: {reason}")]
    Deserialization { key: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used by the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    StateConflict,
    Internal,
}

/// Master error type for all TenderHub errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl TenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenderError::Validation(_) => ErrorKind::Validation,
            TenderError::Access(_) => ErrorKind::NotFound,
            TenderError::State(_) => ErrorKind::StateConflict,
            TenderError::Storage(_) | TenderError::Cache(_) | TenderError::Config(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type alias for TenderHub operations.
pub type TenderResult<T> = Result<T, TenderError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_insert_failed() {
        let err = StorageError::InsertFailed {
            entity_type: EntityType::Bid,
            reason: "tender 9 missing".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Insert failed"));
        assert!(msg.contains("Bid"));
        assert!(msg.contains("tender 9 missing"));
    }

    #[test]
    fn test_access_error_public_message_hides_cause() {
        let missing = AccessError::tender_not_found(TenderId::new(1));
        let denied = AccessError::NotOwner {
            entity_type: EntityType::Tender,
            id: 1,
            actor_id: 2,
        };
        assert_ne!(missing, denied);
        assert_eq!(missing.public_message(), denied.public_message());
        assert_eq!(missing.public_message(), "Tender not found or access denied");
    }

    #[test]
    fn test_wrong_parent_reports_as_bid() {
        let err = AccessError::WrongParent {
            bid_id: BidId::new(5),
            tender_id: TenderId::new(1),
            actual_tender_id: TenderId::new(2),
        };
        assert_eq!(err.entity_type(), EntityType::Bid);
        assert_eq!(
            err.public_message(),
            AccessError::bid_not_found(BidId::new(5)).public_message()
        );
    }

    #[test]
    fn test_state_error_display_not_open_for_bids() {
        let err = StateError::NotOpenForBids {
            tender_id: TenderId::new(4),
            status: TenderStatus::Awarded,
        };
        assert_eq!(err.to_string(), "Tender 4 is awarded and not open for bids");
    }

    #[test]
    fn test_error_kinds() {
        let validation = TenderError::from(ValidationError::RequiredFieldMissing {
            field: "title".to_string(),
        });
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let access = TenderError::from(AccessError::bid_not_found(BidId::new(1)));
        assert_eq!(access.kind(), ErrorKind::NotFound);
        assert!(access.is_not_found());

        let state = TenderError::from(StateError::AwardViaUpdate {
            tender_id: TenderId::new(1),
        });
        assert_eq!(state.kind(), ErrorKind::StateConflict);

        let storage = TenderError::from(StorageError::LockPoisoned);
        assert_eq!(storage.kind(), ErrorKind::Internal);

        let cache = TenderError::from(CacheError::Unavailable {
            reason: "down".to_string(),
        });
        assert_eq!(cache.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "cache_ttl".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("cache_ttl"));
        assert!(msg.contains("must be positive"));
    }
}
