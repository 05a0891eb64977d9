//! Request and response bodies that exist only at the HTTP boundary.
//!
//! Tender and bid drafts are decoded straight into the core's `NewTender` and
//! `NewBid`; only the status update needs boundary-side checking.

use serde::{Deserialize, Serialize};
use tenderhub_core::TenderStatus;
use tenderhub_storage::CacheStats;

use crate::error::{ApiError, ApiResult};

/// Body of `PUT /api/client/tenders/:tender_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateTenderRequest {
    /// One of `open`, `closed`, `awarded`.
    pub status: String,
}

impl UpdateTenderRequest {
    /// Check the requested status against the known set.
    ///
    /// Whether the transition is allowed is decided by the tender manager.
    pub fn target_status(&self) -> ApiResult<TenderStatus> {
        self.status.trim().parse::<TenderStatus>().map_err(|_| {
            ApiError::invalid_input(format!(
                "Invalid status '{}', expected one of: open, closed, awarded",
                self.status
            ))
        })
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub cache: CacheHealth,
}

/// Cache counters reported by `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CacheHealth {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheHealth {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            entries: stats.entry_count,
        }
    }
}
