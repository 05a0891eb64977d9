//! TenderHub Telemetry - Logging and Metrics
//!
//! Structured JSON logging through `tracing-subscriber` and Prometheus metrics
//! exposed at `/metrics`.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, TenderHubMetrics, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, TelemetryConfig};
