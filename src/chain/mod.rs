//! Chain SDK integration.
//!
//! # Data Flow
//! ```text
//! private key (provider input, storage, environment)
//!     → wallet.rs (accounts, message and typed-data signing)
//!     → client.rs (ClientFactory builds a ChainClient per network)
//!     → session dispatcher (gas price, submit, receipts)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - RPC queries have configurable timeouts

pub mod client;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, ClientFactory, RpcClient, RpcClientFactory, SharedClient};
pub use types::{ChainId, ConnectError, ConnectResult, Network, Receipt};
pub use wallet::Wallet;
