//! Local signing wallet.
//!
//! # Security
//! - Keys are never logged or serialized
//! - Only the derived addresses leave this module

use alloy::dyn_abi::TypedData;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};

use crate::chain::types::{ConnectError, ConnectResult};

/// Environment variable read by the environment-key provider.
pub const PRIVATE_KEY_ENV_VAR: &str = "CELO_CONNECT_PRIVATE_KEY";

/// A set of signers, one per account.
///
/// The first signer is the wallet's default account. A wallet may hold no
/// signers at all, in which case every signing call fails with
/// [`ConnectError::NoAccountAvailable`].
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    signers: Vec<PrivateKeySigner>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> ConnectResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ConnectError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet loaded from private key");

        Ok(Self::from_signers(vec![signer]))
    }

    /// Load wallet from the `CELO_CONNECT_PRIVATE_KEY` environment variable.
    pub fn from_env() -> ConnectResult<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    pub fn from_env_var(var: &str) -> ConnectResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            ConnectError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    pub fn from_signers(signers: Vec<PrivateKeySigner>) -> Self {
        Self { signers }
    }

    /// Accounts in the order the wallet reports them.
    pub fn accounts(&self) -> Vec<Address> {
        self.signers.iter().map(|s| s.address()).collect()
    }

    pub fn has_account(&self, account: Address) -> bool {
        self.signers.iter().any(|s| s.address() == account)
    }

    fn signer(&self, account: Address) -> ConnectResult<&PrivateKeySigner> {
        self.signers
            .iter()
            .find(|s| s.address() == account)
            .ok_or(ConnectError::NoAccountAvailable)
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub async fn sign_message(&self, account: Address, message: &[u8]) -> ConnectResult<Signature> {
        self.signer(account)?
            .sign_message(message)
            .await
            .map_err(|e| ConnectError::Wallet(format!("Message signing failed: {}", e)))
    }

    /// Sign an EIP-712 typed data payload.
    pub async fn sign_typed_data(&self, account: Address, payload: &TypedData) -> ConnectResult<Signature> {
        self.signer(account)?
            .sign_dynamic_typed_data(payload)
            .await
            .map_err(|e| ConnectError::Wallet(format!("Typed data signing failed: {}", e)))
    }

    /// Transaction signer for alloy providers, `None` for an empty wallet.
    pub fn ethereum_wallet(&self) -> Option<EthereumWallet> {
        let (first, rest) = self.signers.split_first()?;
        let mut wallet = EthereumWallet::new(first.clone());
        for signer in rest {
            wallet.register_signer(signer.clone());
        }
        Some(wallet)
    }
}
