//! Client REST API Routes
//!
//! Tender creation, listing, status updates, deletion, and the award workflow.
//! Every mutating route requires the `x-actor-id` header, read as the client id.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tenderhub_core::{Bid, BidId, ClientId, NewTender, Tender, TenderId};
use tenderhub_market::Marketplace;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Actor, JsonBody, PathId};
use crate::routes::run_blocking;
use crate::state::AppState;
use crate::types::UpdateTenderRequest;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/client/tenders - Create a new tender
#[utoipa::path(
    post,
    path = "/api/client/tenders",
    tag = "Tenders",
    request_body = NewTender,
    params(("x-actor-id" = i64, Header, description = "Client id")),
    responses(
        (status = 201, description = "Tender created", body = Tender),
        (status = 400, description = "Invalid tender", body = ApiError),
        (status = 401, description = "Missing actor", body = ApiError),
    ),
)]
pub async fn create_tender(
    State(market): State<Marketplace>,
    Actor(client_id): Actor<ClientId>,
    JsonBody(draft): JsonBody<NewTender>,
) -> ApiResult<impl IntoResponse> {
    let tender = run_blocking(move || market.tenders().create_tender(draft, client_id)).await?;
    Ok((StatusCode::CREATED, Json(tender)))
}

/// GET /api/client/tenders - List all tenders
#[utoipa::path(
    get,
    path = "/api/client/tenders",
    tag = "Tenders",
    responses(
        (status = 200, description = "All tenders", body = Vec<Tender>),
    ),
)]
pub async fn list_tenders(State(market): State<Marketplace>) -> ApiResult<Json<Vec<Tender>>> {
    let tenders = run_blocking(move || market.tenders().get_tenders()).await?;
    Ok(Json(tenders))
}

/// GET /api/client/tenders/:tender_id - Get a tender by id
#[utoipa::path(
    get,
    path = "/api/client/tenders/{tender_id}",
    tag = "Tenders",
    params(("tender_id" = i64, Path, description = "Tender id")),
    responses(
        (status = 200, description = "Tender details", body = Tender),
        (status = 404, description = "Tender not found", body = ApiError),
    ),
)]
pub async fn get_tender(
    State(market): State<Marketplace>,
    PathId(tender_id): PathId<TenderId>,
) -> ApiResult<Json<Tender>> {
    let tender = run_blocking(move || market.tenders().get_tender_by_id(tender_id)).await?;
    Ok(Json(tender))
}

/// PUT /api/client/tenders/:tender_id - Change a tender's status
#[utoipa::path(
    put,
    path = "/api/client/tenders/{tender_id}",
    tag = "Tenders",
    request_body = UpdateTenderRequest,
    params(
        ("tender_id" = i64, Path, description = "Tender id"),
        ("x-actor-id" = i64, Header, description = "Client id"),
    ),
    responses(
        (status = 200, description = "Tender updated", body = Tender),
        (status = 400, description = "Invalid status or transition", body = ApiError),
        (status = 404, description = "Tender not found or access denied", body = ApiError),
    ),
)]
pub async fn update_tender(
    State(market): State<Marketplace>,
    Actor(client_id): Actor<ClientId>,
    PathId(tender_id): PathId<TenderId>,
    JsonBody(req): JsonBody<UpdateTenderRequest>,
) -> ApiResult<Json<Tender>> {
    let status = req.target_status()?;
    let tender =
        run_blocking(move || market.tenders().update_tender(tender_id, client_id, status)).await?;
    Ok(Json(tender))
}

/// DELETE /api/client/tenders/:tender_id - Delete a tender and its bids
#[utoipa::path(
    delete,
    path = "/api/client/tenders/{tender_id}",
    tag = "Tenders",
    params(
        ("tender_id" = i64, Path, description = "Tender id"),
        ("x-actor-id" = i64, Header, description = "Client id"),
    ),
    responses(
        (status = 200, description = "Deleted tender", body = Tender),
        (status = 404, description = "Tender not found or access denied", body = ApiError),
    ),
)]
pub async fn delete_tender(
    State(market): State<Marketplace>,
    Actor(client_id): Actor<ClientId>,
    PathId(tender_id): PathId<TenderId>,
) -> ApiResult<Json<Tender>> {
    let tender = run_blocking(move || market.tenders().delete_tender(tender_id, client_id)).await?;
    Ok(Json(tender))
}

/// POST /api/client/tenders/:tender_id/award/:bid_id - Award a tender to a bid
#[utoipa::path(
    post,
    path = "/api/client/tenders/{tender_id}/award/{bid_id}",
    tag = "Tenders",
    params(
        ("tender_id" = i64, Path, description = "Tender id"),
        ("bid_id" = i64, Path, description = "Winning bid id"),
        ("x-actor-id" = i64, Header, description = "Client id"),
    ),
    responses(
        (status = 200, description = "Tender awarded", body = Tender),
        (status = 400, description = "Tender is not open", body = ApiError),
        (status = 404, description = "Tender or bid not found", body = ApiError),
    ),
)]
pub async fn award_tender(
    State(market): State<Marketplace>,
    Actor(client_id): Actor<ClientId>,
    PathId((tender_id, bid_id)): PathId<(TenderId, BidId)>,
) -> ApiResult<Json<Tender>> {
    let tender =
        run_blocking(move || market.tenders().award_tender(tender_id, client_id, bid_id)).await?;
    Ok(Json(tender))
}

/// GET /api/client/tenders/:tender_id/bids - List the bids on a tender
#[utoipa::path(
    get,
    path = "/api/client/tenders/{tender_id}/bids",
    tag = "Tenders",
    params(("tender_id" = i64, Path, description = "Tender id")),
    responses(
        (status = 200, description = "Bids on the tender", body = Vec<Bid>),
        (status = 404, description = "Tender not found", body = ApiError),
    ),
)]
pub async fn list_tender_bids(
    State(market): State<Marketplace>,
    PathId(tender_id): PathId<TenderId>,
) -> ApiResult<Json<Vec<Bid>>> {
    let bids = run_blocking(move || market.bids().get_all_bids(tender_id)).await?;
    Ok(Json(bids))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/tenders", post(create_tender).get(list_tenders))
        .route(
            "/tenders/:tender_id",
            get(get_tender).put(update_tender).delete(delete_tender),
        )
        .route("/tenders/:tender_id/award/:bid_id", post(award_tender))
        .route("/tenders/:tender_id/bids", get(list_tender_bids))
}
