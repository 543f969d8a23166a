//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): requests by balancer and outcome
//! - `balancer_capacity_rejections_total` (counter): admission-control rejections
//! - `balancer_in_flight` (gauge): requests currently holding a capacity slot
//! - `balancer_provider_health` (gauge): 0=dead, 1=recovering, 2=healthy
//! - `balancer_health_transitions_total` (counter): transitions by target state
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::state::ProviderHealth;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder")
        }
    }
}

pub fn record_request(balancer: &str, outcome: &'static str) {
    counter!(
        "balancer_requests_total",
        "balancer" => balancer.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_capacity_rejection(balancer: &str) {
    counter!("balancer_capacity_rejections_total", "balancer" => balancer.to_string()).increment(1);
}

pub fn record_in_flight(balancer: &str, in_flight: usize) {
    gauge!("balancer_in_flight", "balancer" => balancer.to_string()).set(in_flight as f64);
}

pub fn record_health_transition(provider: &str, health: ProviderHealth) {
    gauge!("balancer_provider_health", "provider" => provider.to_string()).set(health as u8 as f64);
    counter!(
        "balancer_health_transitions_total",
        "provider" => provider.to_string(),
        "to" => health.as_str()
    )
    .increment(1);
}

/// Drop the health gauge of an unregistered provider back to dead.
pub fn clear_provider_health(provider: &str) {
    gauge!("balancer_provider_health", "provider" => provider.to_string())
        .set(ProviderHealth::Dead as u8 as f64);
}
