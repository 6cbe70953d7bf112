//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::chain::types::Network;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConnectConfig {
    /// Dapp identity shown in the connect modal.
    pub dapp: DappConfig,

    /// Durable session storage.
    pub storage: StorageConfig,

    /// Per-network endpoint overrides.
    pub networks: NetworksConfig,

    /// RPC behaviour.
    pub rpc: RpcConfig,

    /// Transaction dispatch policy.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DappConfig {
    /// Name rendered in the connect modal header.
    pub name: String,

    /// Network used when nothing was persisted.
    pub default_network: Network,
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            name: "celo-connect".to_string(),
            default_network: Network::Alfajores,
        }
    }
}

/// Session storage location. No path means `celo-connect-session.json`;
/// `-` selects an in-memory store.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<String>,
}

/// Endpoint override for one network. Unset fields fall back to the
/// network's public defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NetworksConfig {
    pub alfajores: EndpointConfig,
    pub baklava: EndpointConfig,
    pub mainnet: EndpointConfig,
}

impl NetworksConfig {
    pub fn endpoint(&self, network: Network) -> &EndpointConfig {
        match network {
            Network::Alfajores => &self.alfajores,
            Network::Baklava => &self.baklava,
            Network::Mainnet => &self.mainnet,
        }
    }

    /// Effective JSON-RPC URL for `network`.
    pub fn rpc_url(&self, network: Network) -> &str {
        self.endpoint(network)
            .rpc_url
            .as_deref()
            .unwrap_or_else(|| network.default_rpc_url())
    }

    pub fn chain_id(&self, network: Network) -> crate::chain::types::ChainId {
        self.endpoint(network)
            .chain_id
            .map(Into::into)
            .unwrap_or_else(|| network.chain_id())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Timeout for handshake, balance and gas price queries in seconds.
    pub timeout_secs: u64,

    /// Upper bound on a receipt wait. `None` waits indefinitely.
    pub receipt_timeout_secs: Option<u64>,

    /// Check the endpoint's chain id when a client is constructed.
    pub verify_chain_id: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            receipt_timeout_secs: None,
            verify_chain_id: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Factor applied to the network's minimum gas price (1.5 = 50% over the floor).
    pub gas_price_multiplier: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            gas_price_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
