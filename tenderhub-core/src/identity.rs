//! Identity types for TenderHub entities and actors.
//!
//! Ids are store-assigned integers wrapped in newtypes so a `TenderId` can never be
//! passed where a `BidId` is expected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Error when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for IdParseError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw store id.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| IdParseError {
                        kind: $label,
                        input: s.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Identifier of a tender.
    TenderId,
    "tender id"
);
define_id!(
    /// Identifier of a bid.
    BidId,
    "bid id"
);
define_id!(
    /// Identifier of the client that owns a tender.
    ClientId,
    "client id"
);
define_id!(
    /// Identifier of the contractor that submitted a bid.
    ContractorId,
    "contractor id"
);
