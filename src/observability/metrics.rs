//! Metrics collection and exposition.
//!
//! # Metrics
//! - `directory_upstream_requests_total` (counter): upstream calls by method, status
//! - `directory_upstream_retries_total` (counter): 429-triggered retries
//! - `directory_snapshot_fetches_total` (counter): full-collection fetches
//! - `directory_cache_lookups_total` (counter): snapshot reads by result (hit, miss, joined)
//! - `directory_http_requests_total` (counter): inbound requests by route, status
//! - `directory_http_request_duration_seconds` (histogram): inbound latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is opt-in via configuration

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_upstream_request(method: &str, status: u16) {
    counter!(
        "directory_upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_retry() {
    counter!("directory_upstream_retries_total").increment(1);
}

pub fn record_snapshot_fetch() {
    counter!("directory_snapshot_fetches_total").increment(1);
}

pub fn record_cache_lookup(result: &'static str) {
    counter!("directory_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    let route = route.to_string();
    counter!(
        "directory_http_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("directory_http_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
