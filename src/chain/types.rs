//! Network definitions, receipts and the error taxonomy.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionReceipt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Networks a session can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    #[default]
    #[serde(alias = "alfajores")]
    Alfajores,
    #[serde(alias = "baklava")]
    Baklava,
    #[serde(alias = "mainnet")]
    Mainnet,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Network; 3] = [Network::Alfajores, Network::Baklava, Network::Mainnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Alfajores => "Alfajores",
            Network::Baklava => "Baklava",
            Network::Mainnet => "Mainnet",
        }
    }

    /// Public forno endpoint for this network.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Alfajores => "https://alfajores-forno.celo-testnet.org",
            Network::Baklava => "https://baklava-forno.celo-testnet.org",
            Network::Mainnet => "https://forno.celo.org",
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Network::Alfajores => ChainId(44787),
            Network::Baklava => ChainId(62320),
            Network::Mainnet => ChainId(42220),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConnectError::UnknownNetwork(s.to_string()))
    }
}

/// Confirmation record of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction was mined but reverted.
    pub status: bool,
    pub gas_used: u64,
    pub from: Address,
    pub to: Option<Address>,
}

impl From<&TransactionReceipt> for Receipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
            gas_used: receipt.gas_used,
            from: receipt.from,
            to: receipt.to,
        }
    }
}

/// Errors surfaced by the connection layer.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Client construction against the network endpoint failed.
    #[error("Network {network} unavailable: {reason}")]
    NetworkUnavailable { network: Network, reason: String },

    /// The attached wallet has no account to sign with.
    #[error("No account available for signing")]
    NoAccountAvailable,

    /// Operation requires a connected session.
    #[error("Session not initialised; connect a wallet first")]
    NotInitialised,

    /// A wallet provider failed to produce a signer.
    #[error("Provider '{provider}' failed to attach: {reason}")]
    ProviderAttachFailure { provider: String, reason: String },

    /// The client handed to the container cannot sign for the address.
    #[error("Client has no signer for {address}")]
    MissingSigner { address: Address },

    /// A transaction of a send failed; later ones were not submitted.
    #[error("Transaction {index} failed: {reason}")]
    TransactionFailure { index: usize, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown network '{0}'")]
    UnknownNetwork(String),

    #[error("Unknown wallet provider '{0}'")]
    UnknownProvider(String),

    /// A provider was selected while the connect modal is closed.
    #[error("Connect modal is not open")]
    ModalClosed,
}

/// Result type for connection-layer operations.
pub type ConnectResult<T> = Result<T, ConnectError>;
