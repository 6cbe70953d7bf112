//! Connect modal state machine.
//!
//! # States
//! - Closed: modal hidden
//! - ProviderList: modal open, waiting for a provider choice
//! - Connecting: selected provider is attaching a signer
//! - Error: attach failed; message shown above the provider list
//!
//! # State Transitions
//! ```text
//! Closed → ProviderList:        container.open_modal()
//! ProviderList|Error → Connecting: select(provider)
//! Connecting → Closed:          signer attached, session initialised
//! Connecting → Error:           attach failed
//! any → Closed:                 dismiss() or container.close_modal()
//! ```
//!
//! A phase belongs to the modal generation it was recorded in; reopening
//! always lands on the provider list.

use alloy::primitives::Address;
use std::sync::Arc;
use tokio::sync::watch;

use crate::chain::types::{ConnectError, ConnectResult};
use crate::modal::provider::{AttachContext, ProviderInfo, WalletProvider};
use crate::observability::metrics;
use crate::session::ConnectionContainer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    ProviderList,
    Connecting { provider: String },
    Error { provider: String, message: String },
}

pub struct ConnectModal {
    container: Arc<ConnectionContainer>,
    providers: Vec<Arc<dyn WalletProvider>>,
    dapp_name: String,
    /// Phase while open, tagged with the modal generation it belongs to;
    /// openness itself is the container's modal flag.
    phase: watch::Sender<(u64, ModalState)>,
}

impl ConnectModal {
    pub fn new(
        container: Arc<ConnectionContainer>,
        dapp_name: impl Into<String>,
        providers: Vec<Arc<dyn WalletProvider>>,
    ) -> Self {
        let (phase, _) = watch::channel((0, ModalState::ProviderList));
        Self {
            container,
            providers,
            dapp_name: dapp_name.into(),
            phase,
        }
    }

    pub fn dapp_name(&self) -> &str {
        &self.dapp_name
    }

    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.providers.iter().map(|p| p.info()).collect()
    }

    pub fn state(&self) -> ModalState {
        if !self.container.modal_open() {
            return ModalState::Closed;
        }
        let phase = self.phase.borrow();
        if phase.0 == self.container.modal_generation() {
            phase.1.clone()
        } else {
            ModalState::ProviderList
        }
    }

    /// Close without connecting.
    pub fn dismiss(&self) {
        self.container.close_modal();
    }

    /// Attach the chosen provider and finalize the session.
    ///
    /// On failure the modal stays open in [`ModalState::Error`]; choosing a
    /// provider again is the only retry.
    pub async fn select(&self, provider_id: &str) -> ConnectResult<Address> {
        if !self.container.modal_open() {
            return Err(ConnectError::ModalClosed);
        }
        let provider = self
            .providers
            .iter()
            .find(|p| p.info().id == provider_id)
            .cloned()
            .ok_or_else(|| ConnectError::UnknownProvider(provider_id.to_string()))?;

        let generation = self.container.modal_generation();
        self.phase.send_replace((
            generation,
            ModalState::Connecting {
                provider: provider_id.to_string(),
            },
        ));
        tracing::info!(provider = provider_id, "Connecting wallet provider");

        match self.connect(provider.as_ref()).await {
            Ok(address) => {
                metrics::record_session_initialised(provider_id);
                self.dismiss();
                Ok(address)
            }
            Err(e) => {
                let reason = match e {
                    ConnectError::ProviderAttachFailure { reason, .. } => reason,
                    other => other.to_string(),
                };
                tracing::warn!(provider = provider_id, error = %reason, "Wallet provider failed to attach");
                self.phase.send_replace((
                    generation,
                    ModalState::Error {
                        provider: provider_id.to_string(),
                        message: reason.clone(),
                    },
                ));
                Err(ConnectError::ProviderAttachFailure {
                    provider: provider_id.to_string(),
                    reason,
                })
            }
        }
    }

    async fn connect(&self, provider: &dyn WalletProvider) -> ConnectResult<Address> {
        let ctx = AttachContext {
            network: self.container.session().network,
            factory: self.container.factory(),
        };
        let attached = provider.attach(&ctx).await?;
        let address = attached.address;

        match attached.private_key {
            Some(key) => {
                self.container
                    .initialize_with_private_key(attached.client, address, &key)
                    .await?
            }
            None => self.container.initialize(attached.client, address).await?,
        }
        Ok(address)
    }
}
