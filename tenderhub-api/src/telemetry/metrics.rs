//! Prometheus Metrics Definitions
//!
//! HTTP request counters and latencies, plus cache gauges refreshed from the
//! cache layer on every scrape.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge, CounterVec, Encoder,
    HistogramVec, IntGauge, TextEncoder,
};
use tenderhub_market::Marketplace;
use tenderhub_storage::CacheStats;

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance, registered once with the default registry.
pub static METRICS: Lazy<ApiResult<TenderHubMetrics>> = Lazy::new(TenderHubMetrics::new);

#[derive(Clone)]
pub struct TenderHubMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    pub cache_hits: IntGauge,
    pub cache_misses: IntGauge,
    pub cache_entries: IntGauge,
}

impl TenderHubMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "tenderhub_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "tenderhub_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            cache_hits: register_int_gauge!(
                "tenderhub_cache_hits",
                "Cache hits since the backend was opened"
            )
            .map_err(|e| registration_error("cache_hits", e))?,

            cache_misses: register_int_gauge!(
                "tenderhub_cache_misses",
                "Cache misses since the backend was opened"
            )
            .map_err(|e| registration_error("cache_misses", e))?,

            cache_entries: register_int_gauge!(
                "tenderhub_cache_entries",
                "Entries currently held by the cache"
            )
            .map_err(|e| registration_error("cache_entries", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Copy the cache counters into the gauges.
    pub fn set_cache_stats(&self, stats: &CacheStats) {
        self.cache_hits.set(saturating_i64(stats.hits));
        self.cache_misses.set(saturating_i64(stats.misses));
        self.cache_entries.set(saturating_i64(stats.entry_count));
    }
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, err))
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler(State(market): State<Marketplace>) -> impl IntoResponse {
    match METRICS.as_ref() {
        Ok(metrics) => metrics.set_cache_stats(&market.context().cache().stats()),
        Err(e) => tracing::error!(error = %e, "Metrics unavailable"),
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
