//! Error Types for the TenderHub API
//!
//! - `ErrorCode` categorizes failures and fixes their HTTP status
//! - `ApiError` is the `{code, message}` body every endpoint returns on failure
//! - `From<TenderError>` decides what a caller is allowed to learn about a failure

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tenderhub_core::{ErrorKind, TenderError};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The actor header is missing or malformed
    Unauthorized,

    /// Domain validation rejected the input
    ValidationFailed,

    /// The request could not be decoded
    InvalidInput,

    /// The entity does not exist or the actor may not see it
    EntityNotFound,

    /// The tender's current status forbids the operation
    StateConflict,

    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,

            // State conflicts are reported as bad requests, like validation.
            ErrorCode::ValidationFailed | ErrorCode::InvalidInput | ErrorCode::StateConflict => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::StateConflict => "Operation conflicts with current state",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntityNotFound, message)
    }

    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StateConflict, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

/// Map a domain error onto its public form.
///
/// Ownership failures and missing entities produce identical bodies. Internal faults
/// are logged in full and replaced by a generic message.
impl From<TenderError> for ApiError {
    fn from(err: TenderError) -> Self {
        match err {
            TenderError::Access(access) => {
                tracing::debug!(error = %access, "Access check failed");
                ApiError::not_found(access.public_message())
            }
            TenderError::Validation(inner) => ApiError::validation_failed(inner.to_string()),
            TenderError::State(inner) => ApiError::state_conflict(inner.to_string()),
            other => {
                debug_assert_eq!(other.kind(), ErrorKind::Internal);
                tracing::error!(error = %other, "Internal error while handling request");
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tenderhub_core::{
        AccessError, BidId, ClientId, EntityType, StateError, StorageError, TenderId,
        TenderStatus, ValidationError,
    };

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::StateConflict.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_owner_and_missing_share_a_body() {
        let denied: ApiError = TenderError::from(AccessError::NotOwner {
            entity_type: EntityType::Tender,
            id: 1,
            actor_id: ClientId::new(2).as_i64(),
        })
        .into();
        let missing: ApiError = TenderError::from(AccessError::tender_not_found(TenderId::new(1))).into();

        assert_eq!(denied, missing);
        assert_eq!(denied.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(denied.message, "Tender not found or access denied");
    }

    #[test]
    fn test_wrong_parent_reported_as_bid_not_found() {
        let err: ApiError = TenderError::from(AccessError::WrongParent {
            bid_id: BidId::new(3),
            tender_id: TenderId::new(1),
            actual_tender_id: TenderId::new(2),
        })
        .into();
        assert_eq!(err.code, ErrorCode::EntityNotFound);
        assert_eq!(err.message, "Bid not found or access denied");
    }

    #[test]
    fn test_validation_and_state_are_bad_requests() {
        let err: ApiError =
            TenderError::from(ValidationError::invalid("budget", "must be positive")).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("budget"));

        let err: ApiError = TenderError::from(StateError::NotAwardable {
            tender_id: TenderId::new(4),
            status: TenderStatus::Awarded,
        })
        .into();
        assert_eq!(err.code, ErrorCode::StateConflict);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err: ApiError = TenderError::from(StorageError::Unavailable {
            reason: "disk on fire at 10.0.0.7".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("10.0.0.7"));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::unauthorized("Missing actor");
        let json = serde_json::to_value(&err)?;
        assert_eq!(
            json,
            serde_json::json!({"code": "UNAUTHORIZED", "message": "Missing actor"})
        );
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::state_conflict("Tender 1 is closed");
        let display = format!("{}", err);
        assert!(display.contains("StateConflict"));
        assert!(display.contains("Tender 1 is closed"));
    }
}
