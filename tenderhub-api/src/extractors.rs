//! Request extractors: the calling actor, typed path ids, and JSON bodies.
//!
//! Every rejection is an [`ApiError`], so malformed requests get the same
//! `{code, message}` body as domain failures.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Header carrying the pre-authenticated actor id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The authenticated caller, parsed into a typed id.
///
/// Authentication happens upstream; this only reads the numeric id it forwards.
/// A missing or non-numeric header is rejected as unauthorized.
///
/// ```rust,ignore
/// async fn create_tender(Actor(client_id): Actor<ClientId>, ...) -> ApiResult<...>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Actor<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Actor<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| ApiError::unauthorized(format!("Missing {} header", ACTOR_HEADER)))?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|value| value.parse::<T>().ok())
            .ok_or_else(|| ApiError::unauthorized(format!("Invalid {} header", ACTOR_HEADER)))?;
        Ok(Actor(id))
    }
}

/// Typed path parameters, e.g. `PathId<TenderId>` or `PathId<(TenderId, BidId)>`.
#[derive(Debug, Clone, Copy)]
pub struct PathId<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Invalid path parameter: {}", e.body_text())))?;
        Ok(PathId(value))
    }
}

/// JSON request body whose decode failures become 400 `INVALID_INPUT` errors.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Invalid JSON body: {}", e.body_text())))?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::http::Request as HttpRequest;
    use tenderhub_core::{ClientId, TenderId};

    async fn actor_from(header: Option<&str>) -> Result<Actor<ClientId>, ApiError> {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACTOR_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Actor::<ClientId>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_actor_parsed() {
        let Actor(client) = actor_from(Some("42")).await.unwrap();
        assert_eq!(client, ClientId::new(42));
    }

    #[tokio::test]
    async fn test_missing_actor_unauthorized() {
        let err = actor_from(None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_non_numeric_actor_unauthorized() {
        let err = actor_from(Some("alice")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(err.message.contains(ACTOR_HEADER));
    }

    #[tokio::test]
    async fn test_path_id_without_route_params_is_invalid_input() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/tenders/x")
            .body(())
            .unwrap()
            .into_parts();
        let err = PathId::<TenderId>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
