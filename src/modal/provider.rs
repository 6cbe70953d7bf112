//! Wallet providers offered by the connect modal.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::chain::client::{ClientFactory, SharedClient};
use crate::chain::types::{ConnectError, ConnectResult, Network};
use crate::chain::wallet::{Wallet, PRIVATE_KEY_ENV_VAR};

/// What the modal renders for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Everything a provider needs to build a signing client.
#[derive(Clone)]
pub struct AttachContext {
    pub network: Network,
    pub factory: Arc<dyn ClientFactory>,
}

/// A client with a signer for `address`.
pub struct AttachedWallet {
    pub client: SharedClient,
    pub address: Address,
    /// Key to persist for direct-key sessions.
    pub private_key: Option<String>,
}

impl fmt::Debug for AttachedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedWallet")
            .field("client", &self.client)
            .field("address", &self.address)
            .field("persists_key", &self.private_key.is_some())
            .finish()
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn info(&self) -> ProviderInfo;

    /// Produce a client with an attached signer, or fail.
    async fn attach(&self, ctx: &AttachContext) -> ConnectResult<AttachedWallet>;
}

/// Build a client for `wallet` using its first account.
async fn attach_wallet(ctx: &AttachContext, wallet: Wallet) -> ConnectResult<(SharedClient, Address)> {
    let address = wallet
        .accounts()
        .first()
        .copied()
        .ok_or(ConnectError::NoAccountAvailable)?;
    let client = ctx
        .factory
        .connect(ctx.network, Some(Arc::new(wallet)), Some(address))
        .await?;
    Ok((client, address))
}

/// Wallet from a key typed in by the user.
pub struct PrivateKeyProvider {
    key: String,
    persist: bool,
}

impl PrivateKeyProvider {
    pub const INFO: ProviderInfo = ProviderInfo {
        id: "private-key",
        name: "Private key",
        description: "Plain text private key, remembered on this device",
    };

    /// Key that is persisted with the session.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            persist: true,
        }
    }

    /// Key that is used for this session only.
    pub fn ephemeral(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            persist: false,
        }
    }
}

impl fmt::Debug for PrivateKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyProvider")
            .field("persist", &self.persist)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletProvider for PrivateKeyProvider {
    fn info(&self) -> ProviderInfo {
        Self::INFO
    }

    async fn attach(&self, ctx: &AttachContext) -> ConnectResult<AttachedWallet> {
        let wallet = Wallet::from_private_key(&self.key)?;
        let (client, address) = attach_wallet(ctx, wallet).await?;
        Ok(AttachedWallet {
            client,
            address,
            private_key: self.persist.then(|| self.key.trim().to_string()),
        })
    }
}

/// Wallet from a key in the process environment. The key is never persisted.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    pub const INFO: ProviderInfo = ProviderInfo {
        id: "env",
        name: "Environment key",
        description: "Private key read from CELO_CONNECT_PRIVATE_KEY",
    };

    pub fn new() -> Self {
        Self::with_var(PRIVATE_KEY_ENV_VAR)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for EnvKeyProvider {
    fn info(&self) -> ProviderInfo {
        Self::INFO
    }

    async fn attach(&self, ctx: &AttachContext) -> ConnectResult<AttachedWallet> {
        let wallet = Wallet::from_env_var(&self.var)?;
        let (client, address) = attach_wallet(ctx, wallet).await?;
        Ok(AttachedWallet {
            client,
            address,
            private_key: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_ids_are_unique() {
        assert_ne!(PrivateKeyProvider::INFO.id, EnvKeyProvider::INFO.id);
    }

    #[test]
    fn test_private_key_provider_debug_hides_key() {
        let provider = PrivateKeyProvider::new("deadbeef");
        let rendered = format!("{:?}", provider);
        assert!(!rendered.contains("deadbeef"));
    }
}
