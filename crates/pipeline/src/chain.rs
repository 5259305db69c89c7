//! Chain JSON-RPC surface consumed by the pipeline, as a trait so tests can
//! substitute a scripted chain.
use alloy_primitives::{Address, B256, Bytes, TxKind, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Chain-level failures. `InsufficientFunds` is the one classification the
/// caller acts on (funding guidance); everything else stays verbatim.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("chain rpc failure: {0}")]
    Rpc(String),

    #[error("could not decode contract return data: {0}")]
    Decode(String),
}

impl ChainError {
    /// Boundary adapter: nodes report funding problems only in prose, so the
    /// substring match lives here, once, against the raw node message.
    pub fn from_rpc_message(message: String) -> Self {
        if message.to_ascii_lowercase().contains("insufficient funds") {
            Self::InsufficientFunds(message)
        } else {
            Self::Rpc(message)
        }
    }
}

/// The handful of chain RPCs the pipeline needs: contract reads, fee levels,
/// account state and raw-transaction broadcast.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_call` against a contract.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

    /// Native balance of `address`.
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Suggested priority fee in wei; not every network exposes this.
    async fn max_priority_fee_per_gas(&self) -> Result<u128, ChainError>;

    /// Transaction count (nonce) for an externally-owned account.
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// `eth_estimateGas` for an ordinary transaction.
    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<u64, ChainError>;

    /// Broadcast a signed, 2718-encoded transaction; returns its hash.
    async fn send_raw_transaction(&self, encoded: Bytes) -> Result<B256, ChainError>;
}

/// [`ChainClient`] backed by an alloy HTTP provider.
#[derive(Debug, Clone)]
pub struct RpcChainClient {
    provider: RootProvider,
}

impl RpcChainClient {
    pub const fn new(provider: RootProvider) -> Self {
        Self { provider }
    }
}

fn rpc_err(error: impl std::fmt::Display) -> ChainError {
    ChainError::from_rpc_message(error.to_string())
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(data),
            ..Default::default()
        };
        self.provider.call(request).await.map_err(rpc_err)
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider.get_balance(address).await.map_err(rpc_err)
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider.get_gas_price().await.map_err(rpc_err)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, ChainError> {
        self.provider
            .get_max_priority_fee_per_gas()
            .await
            .map_err(rpc_err)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(rpc_err)
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<u64, ChainError> {
        let request = TransactionRequest {
            from: Some(from),
            to: Some(TxKind::Call(to)),
            value: Some(value),
            input: TransactionInput::new(data),
            ..Default::default()
        };
        self.provider.estimate_gas(request).await.map_err(rpc_err)
    }

    async fn send_raw_transaction(&self, encoded: Bytes) -> Result<B256, ChainError> {
        let pending = self
            .provider
            .send_raw_transaction(&encoded)
            .await
            .map_err(rpc_err)?;
        Ok(*pending.tx_hash())
    }
}
