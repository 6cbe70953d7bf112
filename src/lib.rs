//! Wallet connection layer for Celo dapps.
//!
//! A [`ConnectionContainer`] owns the session (network, address, client) and
//! persists it; a [`ConnectModal`] lets the user pick a wallet provider;
//! transactions and signatures go through the container once connected.

pub mod chain;
pub mod config;
pub mod modal;
pub mod observability;
pub mod session;
pub mod storage;

pub use chain::{ChainClient, ClientFactory, ConnectError, ConnectResult, Network, Receipt, Wallet};
pub use config::ConnectConfig;
pub use modal::{ConnectModal, ModalState};
pub use session::{ConnectionContainer, Outcome, SendOptions, Session};
