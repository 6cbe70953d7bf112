//! Persisted session fields.

use alloy::primitives::Address;
use std::fmt;

use crate::chain::types::Network;
use crate::chain::wallet::Wallet;
use crate::storage::KeyValueStore;

/// Storage keys.
pub mod keys {
    pub const LAST_USED_NETWORK: &str = "use-contractkit/last-used-network";
    pub const LAST_USED_ADDRESS: &str = "use-contractkit/last-used-address";
    pub const PRIVATE_KEY: &str = "use-contractkit/private-key";
}

/// Subset of the session kept across restarts.
///
/// A private key, when present, always matches `address`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PersistedFields {
    pub network: Option<Network>,
    pub address: Option<Address>,
    pub private_key: Option<String>,
}

impl fmt::Debug for PersistedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedFields")
            .field("network", &self.network)
            .field("address", &self.address)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Read the persisted fields. Performs no writes.
///
/// Unreadable values are dropped. A stored key overrides the stored address
/// with the address it derives.
pub fn load_persisted_session(store: &dyn KeyValueStore) -> PersistedFields {
    let network = store
        .get(keys::LAST_USED_NETWORK)
        .and_then(|raw| match raw.parse::<Network>() {
            Ok(network) => Some(network),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring persisted network");
                None
            }
        });

    let mut address = store
        .get(keys::LAST_USED_ADDRESS)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| match raw.parse::<Address>() {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring persisted address");
                None
            }
        });

    let private_key = store.get(keys::PRIVATE_KEY).and_then(|key| {
        match Wallet::from_private_key(&key) {
            Ok(wallet) => {
                address = wallet.accounts().first().copied();
                Some(key)
            }
            Err(_) => {
                tracing::warn!("Ignoring unreadable persisted private key");
                None
            }
        }
    });

    PersistedFields {
        network,
        address,
        private_key,
    }
}
