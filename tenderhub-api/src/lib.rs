//! TenderHub API - REST Layer
//!
//! Axum routes over the [`tenderhub_market::Marketplace`]. The marketplace core is
//! synchronous; handlers hand each call to the blocking pool. Callers are identified
//! by the `x-actor-id` header set by an upstream authenticator.

pub mod config;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

pub use config::{ApiConfig, CacheBackendKind};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::{Actor, JsonBody, PathId, ACTOR_HEADER};
pub use openapi::ApiDoc;
pub use routes::{create_api_router, run_blocking};
pub use state::AppState;
pub use types::*;
