//! OpenAPI Specification for the TenderHub API
//!
//! Generated with utoipa from the route annotations and the core entity types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{client, contractor, health};
use crate::telemetry::metrics;
use crate::types::{CacheHealth, HealthResponse, UpdateTenderRequest};

use tenderhub_core::{
    Bid, BidId, BidStatus, ClientId, ContractorId, NewBid, NewTender, Tender, TenderId,
    TenderStatus,
};

/// OpenAPI document for the TenderHub API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TenderHub API",
        version = "0.1.0",
        description = "Tendering marketplace: clients post tenders, contractors bid, clients award",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Tenders", description = "Client-side tender lifecycle and award"),
        (name = "Bids", description = "Contractor-side bid lifecycle"),
        (name = "Health", description = "Liveness and cache statistics"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        client::create_tender,
        client::list_tenders,
        client::get_tender,
        client::update_tender,
        client::delete_tender,
        client::award_tender,
        client::list_tender_bids,

        contractor::create_bid,
        contractor::get_bid,
        contractor::list_my_bids,
        contractor::delete_bid,

        health::health,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            ApiError, ErrorCode,
            UpdateTenderRequest, HealthResponse, CacheHealth,
            Tender, NewTender, TenderStatus, TenderId, ClientId,
            Bid, NewBid, BidStatus, BidId, ContractorId
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
