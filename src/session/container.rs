//! Connection state container.
//!
//! Single source of truth for network, address and client. State is
//! published through a `watch` channel; every mutation notifies subscribers.
//! Mutations are serialized so a client rebuild never interleaves with
//! another change. Client handles read from an older snapshot may be stale
//! after a network switch or a disconnect.

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, U256};
use alloy::signers::Signature;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::chain::client::{ClientFactory, SharedClient};
use crate::chain::types::{ConnectError, ConnectResult, Network, Receipt};
use crate::chain::wallet::Wallet;
use crate::config::schema::ConnectConfig;
use crate::observability::metrics;
use crate::session::dispatch::{dispatch, PendingTransactions, SendOptions};
use crate::session::persistence::{keys, load_persisted_session};
use crate::session::state::{Outcome, Session};
use crate::session::switch::rebuild_client;
use crate::storage::KeyValueStore;

pub struct ConnectionContainer {
    factory: Arc<dyn ClientFactory>,
    store: Arc<dyn KeyValueStore>,
    gas_price_multiplier: f64,
    state: watch::Sender<Session>,
    modal: watch::Sender<bool>,
    modal_opens: AtomicU64,
    mutation: Mutex<()>,
}

impl ConnectionContainer {
    /// Rehydrate the session from `store` and build its client.
    ///
    /// A persisted private key restores its wallet and starts the session
    /// initialised for the key's address.
    pub async fn new(
        factory: Arc<dyn ClientFactory>,
        store: Arc<dyn KeyValueStore>,
        config: &ConnectConfig,
    ) -> ConnectResult<Self> {
        let persisted = load_persisted_session(store.as_ref());
        if persisted.private_key.is_none() && store.get(keys::PRIVATE_KEY).is_some() {
            store.remove(keys::PRIVATE_KEY)?;
        }

        let network = persisted.network.unwrap_or(config.dapp.default_network);
        let wallet = persisted
            .private_key
            .as_deref()
            .map(Wallet::from_private_key)
            .transpose()?
            .map(Arc::new);

        let (client, initialised) = match wallet {
            Some(wallet) => {
                let account = wallet.accounts().first().copied();
                let client = factory.connect(network, Some(wallet), account).await?;
                (client, account.is_some())
            }
            None => (factory.connect(network, None, None).await?, false),
        };

        let address = client.default_account().or(persisted.address);
        if initialised {
            if let Some(address) = address {
                store.set(keys::LAST_USED_ADDRESS, &address.to_string().to_lowercase())?;
            }
        }

        tracing::info!(
            network = %network,
            address = ?address,
            initialised = initialised,
            "Session restored"
        );

        let (state, _) = watch::channel(Session {
            network,
            address,
            initialised,
            client,
        });
        let (modal, _) = watch::channel(false);

        Ok(Self {
            factory,
            store,
            gas_price_multiplier: config.dispatch.gas_price_multiplier,
            state,
            modal,
            modal_opens: AtomicU64::new(0),
            mutation: Mutex::new(()),
        })
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn factory(&self) -> Arc<dyn ClientFactory> {
        self.factory.clone()
    }

    /// RPC endpoint of the current network.
    pub fn endpoint(&self) -> String {
        self.state.borrow().client.endpoint().to_string()
    }

    /// Switch to `network`, rebuilding the client.
    ///
    /// An attached wallet is carried over and the address follows its first
    /// account. On failure the session is left untouched.
    pub async fn update_network(&self, network: Network) -> ConnectResult<()> {
        let _guard = self.mutation.lock().await;

        let current = self.state.borrow().client.clone();
        let client = rebuild_client(self.factory.as_ref(), current.as_ref(), network).await?;

        self.store.set(keys::LAST_USED_NETWORK, network.as_str())?;
        let default_account = client.default_account();
        if let Some(account) = default_account {
            self.store
                .set(keys::LAST_USED_ADDRESS, &account.to_string().to_lowercase())?;
        }

        self.state.send_modify(|session| {
            session.network = network;
            session.client = client;
            if default_account.is_some() {
                session.address = default_account;
            }
        });

        metrics::record_network_switch(network);
        tracing::info!(network = %network, address = ?default_account, "Network switched");
        Ok(())
    }

    /// Finalize a connection with a client whose wallet signs for `address`.
    pub async fn initialize(&self, client: SharedClient, address: Address) -> ConnectResult<()> {
        self.install(client, address, None).await
    }

    /// As [`initialize`](Self::initialize), also persisting the private key
    /// together with the address.
    pub async fn initialize_with_private_key(
        &self,
        client: SharedClient,
        address: Address,
        private_key: &str,
    ) -> ConnectResult<()> {
        self.install(client, address, Some(private_key)).await
    }

    async fn install(
        &self,
        client: SharedClient,
        address: Address,
        private_key: Option<&str>,
    ) -> ConnectResult<()> {
        let signs_for_address = client
            .wallet()
            .map(|w| w.has_account(address))
            .unwrap_or(false);
        if !signs_for_address {
            return Err(ConnectError::MissingSigner { address });
        }

        let _guard = self.mutation.lock().await;

        let network = client.network();
        let address_hex = address.to_string().to_lowercase();
        let mut entries = vec![
            (keys::LAST_USED_NETWORK, network.as_str()),
            (keys::LAST_USED_ADDRESS, address_hex.as_str()),
        ];
        // A stored key must always belong to the stored address.
        let stale: &[&str] = match private_key {
            Some(key) => {
                entries.push((keys::PRIVATE_KEY, key));
                &[]
            }
            None => &[keys::PRIVATE_KEY],
        };
        self.store.apply(&entries, stale)?;

        self.state.send_modify(|session| {
            session.network = network;
            session.address = Some(address);
            session.client = client;
            session.initialised = true;
        });

        tracing::info!(network = %network, address = %address, "Session initialised");
        Ok(())
    }

    /// Forget the connected wallet and fall back to a bare client.
    ///
    /// Address and key are cleared before the rebuild, so they stay cleared
    /// even when the rebuild fails.
    pub async fn disconnect(&self) -> ConnectResult<()> {
        let _guard = self.mutation.lock().await;

        self.state.send_modify(|session| {
            session.address = None;
            session.initialised = false;
        });
        self.store
            .remove_many(&[keys::PRIVATE_KEY, keys::LAST_USED_ADDRESS])?;
        metrics::record_disconnect();

        let network = self.state.borrow().network;
        let client = self.factory.connect(network, None, None).await?;
        self.state.send_modify(|session| session.client = client);

        tracing::info!(network = %network, "Session disconnected");
        Ok(())
    }

    /// Show the connect modal. Each closed to open transition starts a new
    /// modal generation.
    pub fn open_modal(&self) {
        self.modal.send_if_modified(|open| {
            if *open {
                return false;
            }
            self.modal_opens.fetch_add(1, Ordering::SeqCst);
            *open = true;
            true
        });
    }

    /// Number of times the modal went from closed to open.
    pub fn modal_generation(&self) -> u64 {
        self.modal_opens.load(Ordering::SeqCst)
    }

    pub fn close_modal(&self) {
        self.modal.send_replace(false);
    }

    pub fn modal_open(&self) -> bool {
        *self.modal.borrow()
    }

    pub fn subscribe_modal(&self) -> watch::Receiver<bool> {
        self.modal.subscribe()
    }

    /// Snapshot of an initialised session, or `None` after opening the modal.
    fn connected_session(&self) -> Option<Session> {
        let session = self.session();
        if session.initialised {
            Some(session)
        } else {
            tracing::debug!("Session not initialised, opening connect modal");
            self.open_modal();
            None
        }
    }

    /// Send one or more transactions in order, waiting for each receipt.
    pub async fn send(
        &self,
        transactions: impl Into<PendingTransactions>,
        options: SendOptions,
    ) -> ConnectResult<Outcome<Vec<Receipt>>> {
        let Some(session) = self.connected_session() else {
            return Ok(Outcome::ConnectionRequired);
        };

        let transactions = transactions.into();
        if transactions.is_empty() {
            return Ok(Outcome::Done(Vec::new()));
        }

        let sender = options
            .from
            .or(session.address)
            .ok_or(ConnectError::NoAccountAvailable)?;

        let receipts = dispatch(
            session.client.as_ref(),
            sender,
            transactions,
            &options,
            self.gas_price_multiplier,
        )
        .await?;
        Ok(Outcome::Done(receipts))
    }

    /// Sign a personal message with the session account.
    pub async fn sign_message(&self, message: &[u8]) -> ConnectResult<Outcome<Signature>> {
        let Some(session) = self.connected_session() else {
            return Ok(Outcome::ConnectionRequired);
        };
        let (wallet, account) = signing_identity(&session)?;
        Ok(Outcome::Done(wallet.sign_message(account, message).await?))
    }

    /// Sign EIP-712 typed data with the session account.
    pub async fn sign_typed_data(&self, payload: &TypedData) -> ConnectResult<Outcome<Signature>> {
        let Some(session) = self.connected_session() else {
            return Ok(Outcome::ConnectionRequired);
        };
        let (wallet, account) = signing_identity(&session)?;
        Ok(Outcome::Done(wallet.sign_typed_data(account, payload).await?))
    }

    /// Native balance of `address` on the current network.
    pub async fn balance(&self, address: Address) -> ConnectResult<U256> {
        let client = self.state.borrow().client.clone();
        client.balance(address).await
    }
}

fn signing_identity(session: &Session) -> ConnectResult<(Arc<Wallet>, Address)> {
    let wallet = session.client.wallet().ok_or(ConnectError::NoAccountAvailable)?;
    let account = session.address.ok_or(ConnectError::NoAccountAvailable)?;
    Ok((wallet, account))
}
