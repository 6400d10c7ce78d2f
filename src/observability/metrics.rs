//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_weather_requests_total` (counter): handled requests by service, status
//! - `cep_weather_request_duration_seconds` (histogram): handler latency by service
//! - `cep_weather_upstream_errors_total` (counter): failed outbound calls by upstream
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
/// Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(service: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "cep_weather_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("cep_weather_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(upstream: &'static str) {
    ::metrics::counter!("cep_weather_upstream_errors_total", "upstream" => upstream).increment(1);
}
