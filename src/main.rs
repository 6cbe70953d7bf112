//! Demo consumer for the connection layer.
//!
//! Every invocation rehydrates the session from the session file, runs one
//! command against it and exits:
//!
//! ```text
//! celo-connect status
//! celo-connect connect --private-key <hex>
//! celo-connect network baklava
//! celo-connect send --count 2
//! celo-connect sign-message "hello"
//! celo-connect disconnect
//! ```
//!
//! `connect --env` uses `CELO_CONNECT_PRIVATE_KEY` for the current invocation
//! only; the key is never written to the session file.

use alloy::dyn_abi::TypedData;
use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, Address, U256};
use alloy::rpc::types::TransactionRequest;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use celo_connect::chain::RpcClientFactory;
use celo_connect::config::{load_config_or_default, ConnectConfig};
use celo_connect::modal::{EnvKeyProvider, PrivateKeyProvider, WalletProvider};
use celo_connect::observability::{logging, metrics};
use celo_connect::storage::{FileStore, KeyValueStore, MemoryStore};
use celo_connect::{ConnectModal, ConnectionContainer, Network, Outcome, SendOptions};

/// Session file used when the config names none.
const DEFAULT_SESSION_FILE: &str = "celo-connect-session.json";

/// Recipient of the demo transfer.
const DEMO_RECIPIENT: &str = "0x73D20479390E1acdB243570b5B739655989412f5";

/// 0.00000001 CELO in wei.
const DEMO_VALUE_WEI: u128 = 10_000_000_000;

const DEMO_TYPED_DATA: &str = r#"{
  "types": {
    "EIP712Domain": [
      { "name": "name", "type": "string" },
      { "name": "version", "type": "string" },
      { "name": "chainId", "type": "uint256" },
      { "name": "verifyingContract", "type": "address" }
    ],
    "Person": [
      { "name": "name", "type": "string" },
      { "name": "wallet", "type": "address" }
    ],
    "Mail": [
      { "name": "from", "type": "Person" },
      { "name": "to", "type": "Person" },
      { "name": "contents", "type": "string" }
    ]
  },
  "primaryType": "Mail",
  "domain": {
    "name": "Ether Mail",
    "version": "1",
    "chainId": 44787,
    "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
  },
  "message": {
    "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
    "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
    "contents": "Hello, Bob!"
  }
}"#;

#[derive(Parser)]
#[command(name = "celo-connect")]
#[command(about = "Connect a wallet, switch networks, sign and send on Celo", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session file; overrides the configured storage path.
    #[arg(short, long)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show network, address and balance
    Status,
    /// List wallet providers
    Providers,
    /// Switch network (alfajores, baklava, mainnet)
    Network { network: Network },
    /// Connect a wallet through the connect modal
    Connect {
        /// Private key to connect and remember
        #[arg(long, conflicts_with = "env")]
        private_key: Option<String>,
        /// Use the key in CELO_CONNECT_PRIVATE_KEY
        #[arg(long)]
        env: bool,
    },
    /// Forget the connected wallet
    Disconnect,
    /// Send native transfers, one after another
    Send {
        #[arg(long, default_value = DEMO_RECIPIENT)]
        to: Address,
        /// Amount in wei
        #[arg(long, default_value_t = DEMO_VALUE_WEI)]
        value: u128,
        /// Number of transfers in the batch
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        gas_limit: Option<u64>,
        /// Gas price in wei, skips the minimum gas price query
        #[arg(long)]
        gas_price: Option<u128>,
    },
    /// Sign a personal message
    SignMessage { message: String },
    /// Sign EIP-712 typed data (built-in sample when no file is given)
    SignTypedData { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = open_store(&cli, &config)?;
    let factory = Arc::new(RpcClientFactory::new(
        config.networks.clone(),
        config.rpc.clone(),
    ));
    let container = Arc::new(
        ConnectionContainer::new(factory, store, &config)
            .await
            .context("failed to restore session")?,
    );

    match cli.command {
        Commands::Status => print_status(&container).await,
        Commands::Providers => {
            for info in [PrivateKeyProvider::INFO, EnvKeyProvider::INFO] {
                println!("{:<12} {:<16} {}", info.id, info.name, info.description);
            }
        }
        Commands::Network { network } => {
            container.update_network(network).await?;
            print_status(&container).await;
        }
        Commands::Connect { private_key, env } => {
            let provider: Arc<dyn WalletProvider> = match (private_key, env) {
                (Some(key), _) => Arc::new(PrivateKeyProvider::new(key)),
                (None, true) => Arc::new(EnvKeyProvider::new()),
                (None, false) => anyhow::bail!("pass --private-key <hex> or --env"),
            };
            let provider_id = provider.info().id;
            let modal = ConnectModal::new(container.clone(), config.dapp.name.clone(), vec![provider]);

            container.open_modal();
            println!("{}: connecting with {}", modal.dapp_name(), provider_id);
            let address = modal.select(provider_id).await?;
            println!("Connected {}", address);
        }
        Commands::Disconnect => {
            container.disconnect().await?;
            println!("Disconnected");
        }
        Commands::Send {
            to,
            value,
            count,
            gas_limit,
            gas_price,
        } => {
            let transactions: Vec<TransactionRequest> = (0..count)
                .map(|_| {
                    TransactionRequest::default()
                        .with_to(to)
                        .with_value(U256::from(value))
                })
                .collect();
            let options = SendOptions {
                gas_limit,
                gas_price,
                ..SendOptions::default()
            };

            match container.send(transactions, options).await? {
                Outcome::Done(receipts) => {
                    for receipt in receipts {
                        println!("{}", serde_json::to_string_pretty(&receipt)?);
                    }
                }
                Outcome::ConnectionRequired => print_connection_required(),
            }
        }
        Commands::SignMessage { message } => {
            match container.sign_message(message.as_bytes()).await? {
                Outcome::Done(signature) => println!("{}", hex::encode_prefixed(signature.as_bytes())),
                Outcome::ConnectionRequired => print_connection_required(),
            }
        }
        Commands::SignTypedData { file } => {
            let json = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => DEMO_TYPED_DATA.to_string(),
            };
            let payload: TypedData = serde_json::from_str(&json).context("invalid typed data")?;

            match container.sign_typed_data(&payload).await? {
                Outcome::Done(signature) => println!("{}", hex::encode_prefixed(signature.as_bytes())),
                Outcome::ConnectionRequired => print_connection_required(),
            }
        }
    }

    Ok(())
}

fn open_store(cli: &Cli, config: &ConnectConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let path = cli
        .session
        .clone()
        .or_else(|| config.storage.path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

    if path.as_os_str() == "-" {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(FileStore::open(&path)?))
}

async fn print_status(container: &ConnectionContainer) {
    let session = container.session();
    println!("network:     {}", session.network);
    println!("endpoint:    {}", container.endpoint());
    println!("address:     {}", session.address_hex());
    println!("initialised: {}", session.initialised);

    if let Some(address) = session.address {
        match container.balance(address).await {
            Ok(balance) => println!("balance:     {} wei", balance),
            Err(e) => tracing::warn!(error = %e, "Balance lookup failed"),
        }
    }
}

fn print_connection_required() {
    eprintln!("No wallet connected. Run `celo-connect connect` first.");
}
