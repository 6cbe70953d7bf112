//! Chain client seam and its JSON-RPC implementation.
//!
//! # Responsibilities
//! - Construct a client for a network endpoint, optionally with a wallet
//! - Verify the endpoint serves the expected chain on construction
//! - Query gas price minimum and balances with timeouts
//! - Submit transactions and wait for their receipts

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{ChainId, ConnectError, ConnectResult, Network, Receipt};
use crate::chain::wallet::Wallet;
use crate::config::schema::{NetworksConfig, RpcConfig};

/// Client handle shared between the container and its consumers.
pub type SharedClient = Arc<dyn ChainClient>;

/// Object capable of querying and submitting operations against one network.
#[async_trait]
pub trait ChainClient: Send + Sync + fmt::Debug {
    fn network(&self) -> Network;

    /// JSON-RPC endpoint this client talks to.
    fn endpoint(&self) -> &str;

    /// Attached signing wallet, if any.
    fn wallet(&self) -> Option<Arc<Wallet>>;

    /// Account used as sender when none is given.
    fn default_account(&self) -> Option<Address>;

    /// Minimum gas price currently accepted by the network, in wei.
    async fn gas_price_minimum(&self) -> ConnectResult<u128>;

    async fn balance(&self, address: Address) -> ConnectResult<U256>;

    /// Submit a fully prepared transaction and block until its receipt.
    async fn send_and_wait(&self, tx: TransactionRequest) -> ConnectResult<Receipt>;
}

/// Builds clients for a network, the SDK's "new kit" entry point.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Construct a client for `network`.
    ///
    /// Fails with [`ConnectError::NetworkUnavailable`] when the endpoint
    /// cannot be reached.
    async fn connect(
        &self,
        network: Network,
        wallet: Option<Arc<Wallet>>,
        default_account: Option<Address>,
    ) -> ConnectResult<SharedClient>;
}

/// Factory producing alloy HTTP clients for the configured endpoints.
#[derive(Debug, Clone, Default)]
pub struct RpcClientFactory {
    networks: NetworksConfig,
    rpc: RpcConfig,
}

impl RpcClientFactory {
    pub fn new(networks: NetworksConfig, rpc: RpcConfig) -> Self {
        Self { networks, rpc }
    }
}

#[async_trait]
impl ClientFactory for RpcClientFactory {
    async fn connect(
        &self,
        network: Network,
        wallet: Option<Arc<Wallet>>,
        default_account: Option<Address>,
    ) -> ConnectResult<SharedClient> {
        let endpoint = self.networks.rpc_url(network).to_string();
        let chain_id = self.networks.chain_id(network);

        let url: url::Url = endpoint.parse().map_err(|e| ConnectError::NetworkUnavailable {
            network,
            reason: format!("Invalid RPC URL '{}': {}", endpoint, e),
        })?;

        let provider = match wallet.as_deref().and_then(Wallet::ethereum_wallet) {
            Some(signer) => ProviderBuilder::new().wallet(signer).connect_http(url).erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        let client = RpcClient {
            network,
            endpoint,
            chain_id,
            provider,
            wallet,
            default_account,
            timeout_duration: Duration::from_secs(self.rpc.timeout_secs),
            receipt_timeout: self.rpc.receipt_timeout_secs.map(Duration::from_secs),
        };

        if self.rpc.verify_chain_id {
            client.verify_chain_id().await?;
        }

        tracing::info!(
            network = %network,
            rpc_url = %client.endpoint,
            signer = client.wallet.is_some(),
            "Chain client constructed"
        );

        Ok(Arc::new(client))
    }
}

/// JSON-RPC client for a single network.
pub struct RpcClient {
    network: Network,
    endpoint: String,
    chain_id: ChainId,
    provider: DynProvider,
    wallet: Option<Arc<Wallet>>,
    default_account: Option<Address>,
    timeout_duration: Duration,
    receipt_timeout: Option<Duration>,
}

impl RpcClient {
    /// Handshake: the endpoint must answer and serve the expected chain.
    async fn verify_chain_id(&self) -> ConnectResult<()> {
        let actual = match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                return Err(ConnectError::NetworkUnavailable {
                    network: self.network,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ConnectError::NetworkUnavailable {
                    network: self.network,
                    reason: format!("no answer within {}s", self.timeout_duration.as_secs()),
                })
            }
        };

        if actual != self.chain_id.0 {
            return Err(ConnectError::ChainMismatch {
                expected: self.chain_id.0,
                actual,
            });
        }
        Ok(())
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_duration.as_secs()
    }
}

#[async_trait]
impl ChainClient for RpcClient {
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
        match timeout(self.timeout_duration, self.provider.get_gas_price()).await {
            Ok(Ok(price)) => Ok(price),
            Ok(Err(e)) => Err(ConnectError::Rpc(e.to_string())),
            Err(_) => Err(ConnectError::Timeout(self.timeout_secs())),
        }
    }

    async fn balance(&self, address: Address) -> ConnectResult<U256> {
        match timeout(self.timeout_duration, self.provider.get_balance(address)).await {
            Ok(Ok(balance)) => Ok(balance),
            Ok(Err(e)) => Err(ConnectError::Rpc(e.to_string())),
            Err(_) => Err(ConnectError::Timeout(self.timeout_secs())),
        }
    }

    async fn send_and_wait(&self, tx: TransactionRequest) -> ConnectResult<Receipt> {
        if self.wallet.is_none() {
            return Err(ConnectError::NoAccountAvailable);
        }

        let tx = tx.with_chain_id(self.chain_id.0);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ConnectError::Rpc(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction submitted, awaiting receipt");

        let receipt = match self.receipt_timeout {
            Some(limit) => timeout(limit, pending.get_receipt())
                .await
                .map_err(|_| ConnectError::Timeout(limit.as_secs()))?,
            None => pending.get_receipt().await,
        }
        .map_err(|e| ConnectError::Rpc(e.to_string()))?;

        Ok(Receipt::from(&receipt))
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("network", &self.network)
            .field("rpc_url", &self.endpoint)
            .field("chain_id", &self.chain_id.0)
            .field("default_account", &self.default_account)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EndpointConfig;

    fn unreachable_factory() -> RpcClientFactory {
        let mut networks = NetworksConfig::default();
        networks.alfajores = EndpointConfig {
            rpc_url: Some("http://127.0.0.1:1".to_string()),
            chain_id: None,
        };
        RpcClientFactory::new(
            networks,
            RpcConfig {
                timeout_secs: 2,
                ..RpcConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_unavailable() {
        let result = unreachable_factory()
            .connect(Network::Alfajores, None, None)
            .await;
        assert!(matches!(
            result,
            Err(ConnectError::NetworkUnavailable {
                network: Network::Alfajores,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_is_network_unavailable() {
        let mut networks = NetworksConfig::default();
        networks.baklava.rpc_url = Some("not a url".to_string());
        let factory = RpcClientFactory::new(networks, RpcConfig::default());

        let err = factory
            .connect(Network::Baklava, None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_construction_without_handshake() {
        let mut factory = unreachable_factory();
        factory.rpc.verify_chain_id = false;

        let wallet = Arc::new(Wallet::from_signers(vec![
            alloy::signers::local::PrivateKeySigner::random(),
        ]));
        let account = wallet.accounts()[0];
        let client = factory
            .connect(Network::Alfajores, Some(wallet), Some(account))
            .await
            .unwrap();

        assert_eq!(client.network(), Network::Alfajores);
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
        assert_eq!(client.default_account(), Some(account));
        assert!(client.wallet().is_some());
    }

    #[tokio::test]
    async fn test_bare_client_cannot_send() {
        let mut factory = unreachable_factory();
        factory.rpc.verify_chain_id = false;
        let client = factory.connect(Network::Alfajores, None, None).await.unwrap();

        let err = client
            .send_and_wait(TransactionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::NoAccountAvailable));
    }
}
