//! Entity types: persisted records and the drafts used to create them.

use crate::{BidId, BidStatus, ClientId, ContractorId, TenderId, TenderStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// A request for work posted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Tender {
    pub tender_id: TenderId,
    pub client_id: ClientId,
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub deadline: Timestamp,
    pub budget: f64,
    pub status: TenderStatus,
    /// Winning bid, set only by the award operation.
    pub awarded_bid_id: Option<BidId>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Tender {
    /// Whether the given client owns this tender.
    pub fn is_owned_by(&self, client_id: ClientId) -> bool {
        self.client_id == client_id
    }
}

/// A contractor's offer against a tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Bid {
    pub bid_id: BidId,
    pub tender_id: TenderId,
    pub contractor_id: ContractorId,
    pub price: f64,
    /// Delivery time in days.
    pub delivery_time: i64,
    pub comments: String,
    pub status: BidStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl Bid {
    pub fn is_submitted_by(&self, contractor_id: ContractorId) -> bool {
        self.contractor_id == contractor_id
    }
}

/// Tender fields supplied by a client on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTender {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub deadline: Timestamp,
    pub budget: f64,
}

/// Bid fields supplied by a contractor on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewBid {
    pub price: f64,
    #[serde(alias = "deliveryTime")]
    pub delivery_time: i64,
    #[serde(default)]
    pub comments: String,
}

/// A validated tender ready for insertion; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TenderRecord {
    pub client_id: ClientId,
    pub title: String,
    pub description: String,
    pub deadline: Timestamp,
    pub budget: f64,
    pub status: TenderStatus,
}

/// A validated bid ready for insertion; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct BidRecord {
    pub tender_id: TenderId,
    pub contractor_id: ContractorId,
    pub price: f64,
    pub delivery_time: i64,
    pub comments: String,
    pub status: BidStatus,
}

/// Fields changed by a conditional tender write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenderUpdate {
    pub status: Option<TenderStatus>,
    pub awarded_bid_id: Option<BidId>,
}

impl TenderUpdate {
    /// Update that only changes the status.
    pub fn status(status: TenderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Update that marks the tender awarded to `bid_id`.
    pub fn award(bid_id: BidId) -> Self {
        Self {
            status: Some(TenderStatus::Awarded),
            awarded_bid_id: Some(bid_id),
        }
    }
}
