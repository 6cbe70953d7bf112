//! Client rebuild on network change.

use crate::chain::client::{ChainClient, ClientFactory, SharedClient};
use crate::chain::types::{ConnectResult, Network};

/// Build the client for `network`, carrying over the wallet of `current`.
///
/// Without a wallet the new client is bare. With one, the same wallet is
/// attached and the default account is the first account it reports; a
/// wallet with no accounts leaves the default account unset.
pub async fn rebuild_client(
    factory: &dyn ClientFactory,
    current: &dyn ChainClient,
    network: Network,
) -> ConnectResult<SharedClient> {
    let Some(wallet) = current.wallet() else {
        return factory.connect(network, None, None).await;
    };

    let default_account = wallet.accounts().first().copied();
    if default_account.is_none() {
        tracing::warn!(network = %network, "Attached wallet reports no accounts");
    }

    factory.connect(network, Some(wallet), default_account).await
}
