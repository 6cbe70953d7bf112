//! Sequential transaction dispatch.
//!
//! # Responsibilities
//! - Price every transaction of a send from one gas price query
//! - Attach sender, gas price and gas limit
//! - Submit in input order, one receipt at a time
//! - Stop at the first failure

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use std::time::Instant;
use uuid::Uuid;

use crate::chain::client::ChainClient;
use crate::chain::types::{ConnectError, ConnectResult, Receipt};
use crate::observability::metrics;

/// Per-send overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Sender address. Defaults to the session address.
    pub from: Option<Address>,
    /// Gas price in wei. When set, the minimum gas price is not queried.
    pub gas_price: Option<u128>,
    /// Gas limit for every transaction. Defaults to SDK estimation.
    pub gas_limit: Option<u64>,
}

/// One transaction or an ordered list of them.
#[derive(Debug, Clone, Default)]
pub struct PendingTransactions(Vec<TransactionRequest>);

impl PendingTransactions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<TransactionRequest> {
        self.0
    }
}

impl From<TransactionRequest> for PendingTransactions {
    fn from(tx: TransactionRequest) -> Self {
        Self(vec![tx])
    }
}

impl From<Vec<TransactionRequest>> for PendingTransactions {
    fn from(txs: Vec<TransactionRequest>) -> Self {
        Self(txs)
    }
}

impl<const N: usize> From<[TransactionRequest; N]> for PendingTransactions {
    fn from(txs: [TransactionRequest; N]) -> Self {
        Self(txs.into())
    }
}

/// Minimum gas price scaled by `multiplier`, at 1/1000 precision.
///
/// Saturates at `u128::MAX`; a multiplier of at least 1.0 never yields less
/// than `minimum`.
pub fn effective_gas_price(minimum: u128, multiplier: f64) -> u128 {
    let per_mille = (multiplier * 1000.0).round().max(0.0) as u128;
    let whole = (minimum / 1000).saturating_mul(per_mille);
    let rest = (minimum % 1000).saturating_mul(per_mille) / 1000;
    whole.saturating_add(rest)
}

/// Submit `transactions` from `sender` in order and collect their receipts.
pub async fn dispatch(
    client: &dyn ChainClient,
    sender: Address,
    transactions: PendingTransactions,
    options: &SendOptions,
    gas_price_multiplier: f64,
) -> ConnectResult<Vec<Receipt>> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let dispatch_id = Uuid::new_v4();
    let network = client.network();

    let gas_price = match options.gas_price {
        Some(price) => price,
        None => {
            let minimum = client.gas_price_minimum().await?;
            effective_gas_price(minimum, gas_price_multiplier)
        }
    };

    tracing::info!(
        dispatch_id = %dispatch_id,
        network = %network,
        sender = %sender,
        gas_price = gas_price,
        count = transactions.len(),
        "Dispatching transactions"
    );

    let mut receipts = Vec::with_capacity(transactions.len());
    for (index, tx) in transactions.into_inner().into_iter().enumerate() {
        let mut tx = tx.with_from(sender).with_gas_price(gas_price);
        if let Some(limit) = options.gas_limit {
            tx = tx.with_gas_limit(limit);
        }

        let started = Instant::now();
        match client.send_and_wait(tx).await {
            Ok(receipt) => {
                metrics::record_transaction(network, "confirmed", started);
                tracing::info!(
                    dispatch_id = %dispatch_id,
                    index = index,
                    tx_hash = %receipt.tx_hash,
                    status = receipt.status,
                    "Transaction confirmed"
                );
                receipts.push(receipt);
            }
            Err(e) => {
                metrics::record_transaction(network, "failed", started);
                tracing::warn!(
                    dispatch_id = %dispatch_id,
                    index = index,
                    error = %e,
                    "Transaction failed, aborting remaining"
                );
                return Err(ConnectError::TransactionFailure {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(receipts)
}
