//! Session snapshot and gated operation outcomes.

use alloy::primitives::Address;

use crate::chain::client::SharedClient;
use crate::chain::types::{ConnectError, ConnectResult, Network};

/// Current connection state as published by the container.
///
/// `initialised == true` implies `client` carries a wallet holding a signer
/// for `address`.
#[derive(Debug, Clone)]
pub struct Session {
    pub network: Network,
    pub address: Option<Address>,
    pub initialised: bool,
    pub client: SharedClient,
}

impl Session {
    /// Lowercase hex address, or an empty string when unset.
    pub fn address_hex(&self) -> String {
        self.address
            .map(|a| a.to_string().to_lowercase())
            .unwrap_or_default()
    }

    pub fn has_signer(&self) -> bool {
        self.client.wallet().is_some()
    }
}

/// Result of an operation that needs a connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Done(T),
    /// The session was not initialised; the connect modal has been opened
    /// and nothing was sent. Re-invoke after connecting.
    ConnectionRequired,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::ConnectionRequired => None,
        }
    }

    pub fn into_result(self) -> ConnectResult<T> {
        self.done().ok_or(ConnectError::NotInitialised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        let done: Outcome<u32> = Outcome::Done(7);
        assert!(done.is_done());
        assert_eq!(done.into_result().unwrap(), 7);

        let pending: Outcome<u32> = Outcome::ConnectionRequired;
        assert!(!pending.is_done());
        assert!(matches!(
            pending.into_result(),
            Err(ConnectError::NotInitialised)
        ));
    }
}
