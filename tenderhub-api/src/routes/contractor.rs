//! Contractor REST API Routes
//!
//! Bid submission, lookup, listing, and withdrawal. The `x-actor-id` header is
//! read as the contractor id.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tenderhub_core::{Bid, BidId, ContractorId, NewBid, TenderId};
use tenderhub_market::Marketplace;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Actor, JsonBody, PathId};
use crate::routes::run_blocking;
use crate::state::AppState;

/// POST /api/contractor/tenders/:tender_id/bid - Place a bid
#[utoipa::path(
    post,
    path = "/api/contractor/tenders/{tender_id}/bid",
    tag = "Bids",
    request_body = NewBid,
    params(
        ("tender_id" = i64, Path, description = "Tender id"),
        ("x-actor-id" = i64, Header, description = "Contractor id"),
    ),
    responses(
        (status = 201, description = "Bid placed", body = Bid),
        (status = 400, description = "Invalid bid or tender not open", body = ApiError),
        (status = 404, description = "Tender not found", body = ApiError),
    ),
)]
pub async fn create_bid(
    State(market): State<Marketplace>,
    Actor(contractor_id): Actor<ContractorId>,
    PathId(tender_id): PathId<TenderId>,
    JsonBody(draft): JsonBody<NewBid>,
) -> ApiResult<impl IntoResponse> {
    let bid =
        run_blocking(move || market.bids().create_bid(draft, tender_id, contractor_id)).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// GET /api/contractor/tenders/:tender_id/bid/:bid_id - Get one bid
#[utoipa::path(
    get,
    path = "/api/contractor/tenders/{tender_id}/bid/{bid_id}",
    tag = "Bids",
    params(
        ("tender_id" = i64, Path, description = "Tender id"),
        ("bid_id" = i64, Path, description = "Bid id"),
    ),
    responses(
        (status = 200, description = "Bid details", body = Bid),
        (status = 404, description = "Bid not found on this tender", body = ApiError),
    ),
)]
pub async fn get_bid(
    State(market): State<Marketplace>,
    PathId((tender_id, bid_id)): PathId<(TenderId, BidId)>,
) -> ApiResult<Json<Bid>> {
    let bid = run_blocking(move || market.bids().get_bid_by_id(bid_id, tender_id)).await?;
    Ok(Json(bid))
}

/// GET /api/contractor/bids - The calling contractor's bids
#[utoipa::path(
    get,
    path = "/api/contractor/bids",
    tag = "Bids",
    params(("x-actor-id" = i64, Header, description = "Contractor id")),
    responses(
        (status = 200, description = "Bids placed by the contractor", body = Vec<Bid>),
        (status = 401, description = "Missing actor", body = ApiError),
    ),
)]
pub async fn list_my_bids(
    State(market): State<Marketplace>,
    Actor(contractor_id): Actor<ContractorId>,
) -> ApiResult<Json<Vec<Bid>>> {
    let bids = run_blocking(move || market.bids().get_contractor_bids(contractor_id)).await?;
    Ok(Json(bids))
}

/// DELETE /api/contractor/bids/:bid_id - Withdraw a bid
#[utoipa::path(
    delete,
    path = "/api/contractor/bids/{bid_id}",
    tag = "Bids",
    params(
        ("bid_id" = i64, Path, description = "Bid id"),
        ("x-actor-id" = i64, Header, description = "Contractor id"),
    ),
    responses(
        (status = 200, description = "Withdrawn bid", body = Bid),
        (status = 404, description = "Bid not found or access denied", body = ApiError),
    ),
)]
pub async fn delete_bid(
    State(market): State<Marketplace>,
    Actor(contractor_id): Actor<ContractorId>,
    PathId(bid_id): PathId<BidId>,
) -> ApiResult<Json<Bid>> {
    let bid = run_blocking(move || market.bids().delete_bid(bid_id, contractor_id)).await?;
    Ok(Json(bid))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/tenders/:tender_id/bid", post(create_bid))
        .route("/tenders/:tender_id/bid/:bid_id", get(get_bid))
        .route("/bids", get(list_my_bids))
        .route("/bids/:bid_id", delete(delete_bid))
}
