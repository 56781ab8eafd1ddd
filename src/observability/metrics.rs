//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by kind, status
//! - `dispatch_request_duration_seconds` (histogram): latency by kind
//! - `dispatch_failures_total` (counter): translated failures by error kind
//! - `dispatch_sessions_active` (gauge): live duplex sessions
//! - `dispatch_session_frames_total` (counter): frames echoed
//!
//! Recording is a no-op until a recorder is installed, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("dispatch_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_failure(kind: &'static str) {
    metrics::counter!("dispatch_failures_total", "kind" => kind).increment(1);
}

pub fn session_opened() {
    metrics::gauge!("dispatch_sessions_active").increment(1.0);
}

pub fn session_closed() {
    metrics::gauge!("dispatch_sessions_active").decrement(1.0);
}

pub fn record_frame() {
    metrics::counter!("dispatch_session_frames_total").increment(1);
}
