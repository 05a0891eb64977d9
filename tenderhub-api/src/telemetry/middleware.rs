//! Axum Middleware for HTTP Request Metrics
//!
//! Wraps every request in a tracing span, records Prometheus metrics, and logs
//! completion.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::METRICS;

/// Numeric path segment.
static ID_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+\b").expect("id segment pattern is valid"));

/// Normalize path for metrics/spans (replace numeric ids with placeholders).
///
/// This prevents high-cardinality label explosion in Prometheus.
pub fn normalize_path(path: &str) -> String {
    ID_SEGMENT.replace_all(path, "/{id}").into_owned()
}

/// Observability middleware for Axum.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        );
    }

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric_id() {
        assert_eq!(
            normalize_path("/api/client/tenders/12345"),
            "/api/client/tenders/{id}"
        );
    }

    #[test]
    fn test_normalize_path_nested_ids() {
        assert_eq!(
            normalize_path("/api/client/tenders/7/award/31"),
            "/api/client/tenders/{id}/award/{id}"
        );
        assert_eq!(
            normalize_path("/api/contractor/tenders/7/bid/8"),
            "/api/contractor/tenders/{id}/bid/{id}"
        );
    }

    #[test]
    fn test_normalize_path_leaves_mixed_segments() {
        assert_eq!(normalize_path("/api/v1/items/12abc"), "/api/v1/items/12abc");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/contractor/bids"), "/api/contractor/bids");
        assert_eq!(normalize_path("/health"), "/health");
    }

    proptest::proptest! {
        #[test]
        fn prop_normalized_route_has_no_ids(tender in 0u64..u64::MAX, bid in 0u64..u64::MAX) {
            let path = format!("/api/contractor/tenders/{tender}/bid/{bid}");
            proptest::prop_assert_eq!(
                normalize_path(&path),
                "/api/contractor/tenders/{id}/bid/{id}"
            );
        }
    }
}
