//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded and local responses by method, status
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_intercepted_total` (counter): interception outcome (suppressed, rewritten, passthrough)
//! - `proxy_token_cache_total` (counter): token-count cache hits and misses
//! - `proxy_token_cache_entries` (gauge): stored token-count responses
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder,
//! which is off by default.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("proxy_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_interception(outcome: &'static str) {
    metrics::counter!("proxy_intercepted_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("proxy_token_cache_total", "result" => result).increment(1);
}

pub fn record_cache_size(entries: usize) {
    metrics::gauge!("proxy_token_cache_entries").set(entries as f64);
}
