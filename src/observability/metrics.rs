//! Metrics collection and exposition.
//!
//! # Metrics
//! - `iviewer_requests_total` (counter): requests by route, status
//! - `iviewer_request_duration_seconds` (histogram): latency by route
//!
//! # Design Decisions
//! - Unmatched requests are recorded under the route label `none`
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label for requests that matched nothing.
pub const NO_ROUTE: &str = "none";

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "iviewer_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("iviewer_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}
