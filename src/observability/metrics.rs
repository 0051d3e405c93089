//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quickcreate_route_dispatch_total` (counter): matched requests by route
//! - `quickcreate_gate_rejections_total` (counter): anonymous requests rejected
//! - `quickcreate_signin_total` (counter): sign-in attempts by outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(route: &str) {
    metrics::counter!("quickcreate_route_dispatch_total", "route" => route.to_string()).increment(1);
}

pub fn record_gate_rejection() {
    metrics::counter!("quickcreate_gate_rejections_total").increment(1);
}

pub fn record_signin(success: bool) {
    metrics::counter!("quickcreate_signin_total", "success" => success.to_string()).increment(1);
}
