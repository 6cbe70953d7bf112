//! Metrics collection and exposition.
//!
//! # Metrics
//! - `connect_network_switches_total` (counter): by network
//! - `connect_sessions_initialised_total` (counter): by wallet provider
//! - `connect_disconnects_total` (counter)
//! - `connect_transactions_total` (counter): by network, status
//! - `connect_transaction_duration_seconds` (histogram): submit to receipt
//!
//! Recording is a no-op until a recorder is installed.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::chain::types::Network;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_network_switch(network: Network) {
    metrics::counter!("connect_network_switches_total", "network" => network.as_str()).increment(1);
}

pub fn record_session_initialised(provider: &str) {
    metrics::counter!("connect_sessions_initialised_total", "provider" => provider.to_string())
        .increment(1);
}

pub fn record_disconnect() {
    metrics::counter!("connect_disconnects_total").increment(1);
}

pub fn record_transaction(network: Network, status: &'static str, started: Instant) {
    metrics::counter!(
        "connect_transactions_total",
        "network" => network.as_str(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("connect_transaction_duration_seconds", "network" => network.as_str())
        .record(started.elapsed().as_secs_f64());
}
