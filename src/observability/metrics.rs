//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): handled requests, labeled by method,
//!   response status, and route class
//! - `edge_request_duration_seconds` (histogram): end-to-end handler latency
//!   per route class
//!
//! # Design Decisions
//! - The route class (`api`, `app`, `redirect`, `unrelated`) is the primary
//!   label axis. There is exactly one upstream, so per-backend labels would
//!   carry no information.
//! - Recording is fire-and-forget. Without an installed recorder the macros
//!   are no-ops, so handlers and tests never pay for an exporter they did
//!   not ask for.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `address` and describe the metrics.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => {
            metrics::describe_counter!(
                "edge_requests_total",
                "Requests handled, by method, status, and route class"
            );
            metrics::describe_histogram!(
                "edge_request_duration_seconds",
                metrics::Unit::Seconds,
                "Request handling latency by route class"
            );
            tracing::info!(address = %address, "Metrics exporter listening");
        }
        Err(error) => {
            tracing::error!(error = %error, "Failed to install metrics exporter");
        }
    }
}

/// Record one handled request against the counter and latency histogram.
pub fn record_request(method: &str, status: StatusCode, route: &'static str, start: Instant) {
    metrics::counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string(),
        "route" => route,
    )
    .increment(1);

    metrics::histogram!("edge_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
