//! Shared utilities for integration testing: a recording in-memory chain.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use celo_connect::chain::{ChainClient, ClientFactory, SharedClient};
use celo_connect::storage::MemoryStore;
use celo_connect::{ConnectConfig, ConnectError, ConnectResult, ConnectionContainer, Network, Receipt, Wallet};

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

pub const GAS_PRICE_MINIMUM: u128 = 5_000_000_000;

/// A chain interaction observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect {
        network: Network,
        signer: bool,
        default_account: Option<Address>,
    },
    GasPriceMinimum {
        network: Network,
    },
    Submit {
        network: Network,
        value: Option<U256>,
        from: Option<Address>,
        gas_price: Option<u128>,
        gas_limit: Option<u64>,
    },
    Receipt {
        network: Network,
        value: Option<U256>,
    },
}

#[derive(Debug, Default)]
struct ChainState {
    calls: Mutex<Vec<Call>>,
    unavailable: Mutex<HashSet<Network>>,
    fail_on_value: Mutex<Option<U256>>,
    submissions: AtomicUsize,
}

impl ChainState {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Client factory over a shared, inspectable mock chain.
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    state: Arc<ChainState>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.state.calls.lock().unwrap().clear();
    }

    /// Make client construction for `network` fail.
    pub fn set_unavailable(&self, network: Network, unavailable: bool) {
        let mut set = self.state.unavailable.lock().unwrap();
        if unavailable {
            set.insert(network);
        } else {
            set.remove(&network);
        }
    }

    /// Reject the transaction carrying `value`.
    pub fn fail_transaction_with_value(&self, value: u64) {
        *self.state.fail_on_value.lock().unwrap() = Some(U256::from(value));
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    async fn connect(
        &self,
        network: Network,
        wallet: Option<Arc<Wallet>>,
        default_account: Option<Address>,
    ) -> ConnectResult<SharedClient> {
        if self.state.unavailable.lock().unwrap().contains(&network) {
            return Err(ConnectError::NetworkUnavailable {
                network,
                reason: "connection refused".to_string(),
            });
        }

        self.state.record(Call::Connect {
            network,
            signer: wallet.is_some(),
            default_account,
        });

        Ok(Arc::new(MockClient {
            network,
            endpoint: format!("mock://{}", network.as_str().to_lowercase()),
            wallet,
            default_account,
            state: self.state.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct MockClient {
    network: Network,
    endpoint: String,
    wallet: Option<Arc<Wallet>>,
    default_account: Option<Address>,
    state: Arc<ChainState>,
}

#[async_trait]
impl ChainClient for MockClient {
    fn network(&self) -> Network {
        self.network
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn wallet(&self) -> Option<Arc<Wallet>> {
        self.wallet.clone()
    }

    fn default_account(&self) -> Option<Address> {
        self.default_account
    }

    async fn gas_price_minimum(&self) -> ConnectResult<u128> {
        self.state.record(Call::GasPriceMinimum {
            network: self.network,
        });
        Ok(GAS_PRICE_MINIMUM)
    }

    async fn balance(&self, _address: Address) -> ConnectResult<U256> {
        Ok(U256::from(1_000_000u64))
    }

    async fn send_and_wait(&self, tx: TransactionRequest) -> ConnectResult<Receipt> {
        if self.wallet.is_none() {
            return Err(ConnectError::NoAccountAvailable);
        }

        self.state.record(Call::Submit {
            network: self.network,
            value: tx.value,
            from: tx.from,
            gas_price: tx.gas_price,
            gas_limit: tx.gas,
        });

        if tx.value.is_some() && *self.state.fail_on_value.lock().unwrap() == tx.value {
            return Err(ConnectError::Rpc("transaction rejected".to_string()));
        }

        // Receipt arrives after a suspension point, like a real round-trip.
        tokio::task::yield_now().await;

        let n = self.state.submissions.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        self.state.record(Call::Receipt {
            network: self.network,
            value: tx.value,
        });

        Ok(Receipt {
            tx_hash: B256::with_last_byte(n as u8),
            block_number: Some(n),
            status: true,
            gas_used: 21_000,
            from: tx.from.unwrap_or_default(),
            to: tx.to.and_then(|kind| kind.to().copied()),
        })
    }
}

pub fn test_address() -> Address {
    TEST_ADDRESS.parse().unwrap()
}

pub fn test_wallet() -> Arc<Wallet> {
    Arc::new(Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap())
}

pub fn random_wallet(accounts: usize) -> Arc<Wallet> {
    Arc::new(Wallet::from_signers(
        (0..accounts).map(|_| PrivateKeySigner::random()).collect(),
    ))
}

/// Container over a fresh mock chain and in-memory store.
pub async fn container() -> (ConnectionContainer, MockFactory, MemoryStore) {
    container_with(ConnectConfig::default(), MemoryStore::new()).await
}

pub async fn container_with(
    config: ConnectConfig,
    store: MemoryStore,
) -> (ConnectionContainer, MockFactory, MemoryStore) {
    let factory = MockFactory::new();
    let container = ConnectionContainer::new(
        Arc::new(factory.clone()),
        Arc::new(store.clone()),
        &config,
    )
    .await
    .unwrap();
    (container, factory, store)
}

/// Initialise `container` with the test wallet on its current network.
pub async fn connect_test_wallet(container: &ConnectionContainer, factory: &MockFactory) -> Address {
    let network = container.session().network;
    let address = test_address();
    let client = factory
        .connect(network, Some(test_wallet()), Some(address))
        .await
        .unwrap();
    container.initialize(client, address).await.unwrap();
    address
}
