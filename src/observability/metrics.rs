//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by route, status
//! - `relay_request_duration_seconds` (histogram): latency by route
//! - `relay_image_attempts_total` (counter): image attempts by disguise, result
//! - `relay_image_outcome_total` (counter): upstream / placeholder / failed / rejected
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_image_attempt(disguise: &str, result: &'static str) {
    metrics::counter!(
        "relay_image_attempts_total",
        "disguise" => disguise.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_image_outcome(outcome: &'static str) {
    metrics::counter!("relay_image_outcome_total", "outcome" => outcome).increment(1);
}
