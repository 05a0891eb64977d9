//! Status and discriminator enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity type discriminator used in errors and cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityType {
    Tender,
    Bid,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Tender => "Tender",
            EntityType::Bid => "Bid",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TENDER STATUS
// ============================================================================

/// Status of a tender.
///
/// ```text
/// create() → Open ──┬── update(closed) ──→ Closed (terminal)
///                   ├── update(open) ────→ Open
///                   └── award(bid) ──────→ Awarded (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    /// Accepting bids and updates
    Open,
    /// Closed by its owner without an award
    Closed,
    /// A winning bid has been selected
    Awarded,
}

impl TenderStatus {
    /// Every status the boundary accepts as input.
    pub const ALL: [TenderStatus; 3] = [
        TenderStatus::Open,
        TenderStatus::Closed,
        TenderStatus::Awarded,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TenderStatus::Open => "open",
            TenderStatus::Closed => "closed",
            TenderStatus::Awarded => "awarded",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, TenderStatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(TenderStatus::Open),
            "closed" => Ok(TenderStatus::Closed),
            "awarded" => Ok(TenderStatus::Awarded),
            _ => Err(TenderStatusParseError(s.to_string())),
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TenderStatus::Closed | TenderStatus::Awarded)
    }

    /// Whether new bids may be placed against a tender in this status.
    pub fn accepts_bids(&self) -> bool {
        matches!(self, TenderStatus::Open)
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TenderStatus {
    type Err = TenderStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid tender status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderStatusParseError(pub String);

impl fmt::Display for TenderStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid tender status: {}", self.0)
    }
}

impl std::error::Error for TenderStatusParseError {}

// ============================================================================
// BID STATUS
// ============================================================================

/// Status of a bid. Bids are created pending and are not transitioned further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    #[default]
    Pending,
}

impl BidStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, BidStatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BidStatus::Pending),
            _ => Err(BidStatusParseError(s.to_string())),
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for BidStatus {
    type Err = BidStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid bid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidStatusParseError(pub String);

impl fmt::Display for BidStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid bid status: {}", self.0)
    }
}

impl std::error::Error for BidStatusParseError {}
