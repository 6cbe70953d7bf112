//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All problems are reported, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::chain::types::Network;
use crate::config::schema::ConnectConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("dapp.name must not be empty")]
    EmptyDappName,

    #[error("dispatch.gas_price_multiplier must be a finite value >= 1.0, got {0}")]
    GasMultiplier(f64),

    #[error("rpc.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("rpc.receipt_timeout_secs must be greater than zero when set")]
    ZeroReceiptTimeout,

    #[error("networks.{network}: invalid rpc_url '{url}'")]
    InvalidRpcUrl { network: Network, url: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ConnectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.dapp.name.trim().is_empty() {
        errors.push(ValidationError::EmptyDappName);
    }

    let multiplier = config.dispatch.gas_price_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::GasMultiplier(multiplier));
    }

    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.rpc.receipt_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroReceiptTimeout);
    }

    for network in Network::ALL {
        let url = config.networks.rpc_url(network);
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidRpcUrl {
                network,
                url: url.to_string(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
