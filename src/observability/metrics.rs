//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rsc_requests_total` (counter): handled requests by mode, status
//! - `rsc_request_duration_seconds` (histogram): latency distribution by mode
//! - `rsc_entries_rendered_total` (counter): component entries rendered
//!
//! Mode is one of `ssr`, `rsc` or `error`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "rsc_requests_total",
        "mode" => mode,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("rsc_request_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_entries(count: usize) {
    metrics::counter!("rsc_entries_rendered_total").increment(count as u64);
}
