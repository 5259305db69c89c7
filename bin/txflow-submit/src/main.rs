//! txflow submission CLI
//!
//! Wires the pipeline together from configuration and submits one contract
//! call, preferring the sponsored path when enabled and falling back to an
//! ordinary signed transaction.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use tracing::{error, info, warn};
use txflow_bundler_client::{BundlerApi, HttpBundlerClient};
use txflow_core::logger::init_logger;
use txflow_pipeline::metrics::init_prometheus_exporter;
use txflow_pipeline::{
    AccountAddressResolver, ChainClient, DirectSendError, DirectTransactionSender,
    EntryPointClient, FactoryClient, GasEstimator, NonceManager, PaymasterClient, RpcChainClient,
    SponsoredOperationBuilder, SponsorshipEnsurer, SubmitRequest, TransactionRouter,
};
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Config {
    /// Chain JSON-RPC endpoint
    #[arg(long, env = "TXFLOW_RPC_URL")]
    rpc_url: Url,

    /// Bundler JSON-RPC endpoint; unset or placeholder values disable the
    /// sponsored path
    #[arg(long, env = "TXFLOW_BUNDLER_URL", default_value = "")]
    bundler_url: String,

    /// Entry-point contract address
    #[arg(
        long,
        env = "TXFLOW_ENTRY_POINT",
        default_value = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"
    )]
    entry_point: Address,

    /// Account factory contract address
    #[arg(long, env = "TXFLOW_FACTORY")]
    factory: Address,

    /// Sponsoring paymaster address; the zero address means self-funded
    /// operations
    #[arg(
        long,
        env = "TXFLOW_PAYMASTER",
        default_value = "0x0000000000000000000000000000000000000000"
    )]
    paymaster: Address,

    /// Chain ID for transaction signing
    #[arg(long, env = "TXFLOW_CHAIN_ID", default_value = "8453")]
    chain_id: u64,

    /// Controlling private key
    #[arg(long, env = "TXFLOW_PRIVATE_KEY")]
    private_key: String,

    /// Per-request bundler timeout in milliseconds
    #[arg(long, env = "TXFLOW_BUNDLER_TIMEOUT_MS", default_value = "15000")]
    bundler_timeout_ms: u64,

    #[arg(long, env = "TXFLOW_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Prometheus listen address
    #[arg(long, env = "TXFLOW_METRICS_ADDRESS", default_value = "0.0.0.0:9000")]
    metrics_addr: SocketAddr,

    /// Contract the call targets
    #[arg(long)]
    target: Address,

    /// ABI-encoded call data, 0x-prefixed
    #[arg(long, default_value = "0x")]
    call_data: Bytes,

    /// Native value in wei to forward with the call
    #[arg(long, default_value = "0")]
    value: U256,

    /// Attempt the sponsored path before falling back to a direct
    /// transaction
    #[arg(long, env = "TXFLOW_GASLESS", default_value = "false")]
    gasless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::parse();
    init_logger(&config.log_level);

    init_prometheus_exporter(config.metrics_addr)?;

    info!(
        message = "Starting txflow submission",
        rpc_url = %config.rpc_url,
        chain_id = config.chain_id,
        target = %config.target,
        gasless = config.gasless,
        metrics_address = %config.metrics_addr,
    );

    let signer: PrivateKeySigner = config.private_key.parse()?;
    let owner = signer.address();

    let provider: RootProvider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(config.rpc_url.clone());
    let chain = Arc::new(RpcChainClient::new(provider));

    let bundler = Arc::new(HttpBundlerClient::new(
        config.bundler_url.clone(),
        config.entry_point,
        Duration::from_millis(config.bundler_timeout_ms),
    )?);
    if !bundler.is_configured() {
        warn!(
            "Bundler endpoint is unset or a placeholder, sponsored submissions will fall back to direct transactions"
        );
    }

    let resolver = AccountAddressResolver::new(FactoryClient::new(chain.clone(), config.factory));
    let nonces = NonceManager::new(
        EntryPointClient::new(chain.clone(), config.entry_point),
        bundler.clone(),
    );
    let builder = SponsoredOperationBuilder::new(resolver, nonces, chain.clone(), config.paymaster);
    let estimator = GasEstimator::new(bundler.clone());
    let ensurer = SponsorshipEnsurer::new(
        PaymasterClient::new(chain.clone(), config.paymaster),
        DirectTransactionSender::new(chain.clone(), signer.clone(), config.chain_id),
    );
    let direct = DirectTransactionSender::new(chain.clone(), signer, config.chain_id);
    let router = TransactionRouter::new(ensurer, builder, estimator, bundler, direct);

    let request = SubmitRequest {
        owner,
        target: config.target,
        call_data: config.call_data.clone(),
        value: config.value,
        gasless: config.gasless,
        paymaster_data: None,
    };

    match router.submit(request).await {
        Ok(hash) => {
            info!(hash = %hash, "Submission accepted");
            Ok(())
        }
        Err(e) => {
            if let DirectSendError::InsufficientFunds { address, .. } = &e {
                match chain.balance(*address).await {
                    Ok(balance) => error!(
                        address = %address,
                        balance_wei = %balance,
                        "Fund this address to submit transactions"
                    ),
                    Err(_) => error!(
                        address = %address,
                        "Fund this address to submit transactions"
                    ),
                }
            }
            Err(e.into())
        }
    }
}
