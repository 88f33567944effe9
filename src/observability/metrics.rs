//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirector_requests_total` (counter): requests by outcome (redirect, passthrough)
//! - `redirector_redirects_total` (counter): redirects by status and tier
//! - `redirector_request_duration_seconds` (histogram): time spent in the redirect layer
//! - `redirector_rules_loaded` (gauge): compiled redirect entries
//! - `redirector_config_reloads_total` (counter): reloads by result
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Labels are low-cardinality; target URLs are never labels

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a request that the redirect layer answered with a redirect.
pub fn record_redirect(status: u16, tier: &'static str, start: Instant) {
    counter!("redirector_requests_total", "outcome" => "redirect").increment(1);
    counter!(
        "redirector_redirects_total",
        "status" => status.to_string(),
        "tier" => tier
    )
    .increment(1);
    histogram!("redirector_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a request handed on to the next handler.
pub fn record_passthrough(start: Instant) {
    counter!("redirector_requests_total", "outcome" => "passthrough").increment(1);
    histogram!("redirector_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rules_loaded(count: usize) {
    gauge!("redirector_rules_loaded").set(count as f64);
}

pub fn record_config_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("redirector_config_reloads_total", "result" => result).increment(1);
}
