//! Ordinary signed-transaction path: EIP-1559 transaction against the
//! target contract, signed with the controlling key and broadcast through
//! `eth_sendRawTransaction`.
use std::sync::Arc;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_network::TxSignerSync;
use alloy_network::eip2718::Encodable2718;
use alloy_primitives::{Address, B256, Bytes, TxKind, U256};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use tracing::info;

use crate::chain::{ChainClient, ChainError};
use crate::fees::current_fees;

/// Terminal failures of the direct path; these reach the caller verbatim.
#[derive(Debug, Error)]
pub enum DirectSendError {
    /// The signer cannot cover gas and value; callers use this to show
    /// funding guidance for `address`.
    #[error("address {address} cannot cover the transaction: {message}")]
    InsufficientFunds { address: Address, message: String },

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    #[error("transaction submission failed: {0}")]
    Submission(String),
}

/// Sends ordinary transactions signed with the controlling key.
#[derive(Debug, Clone)]
pub struct DirectTransactionSender<C> {
    chain: Arc<C>,
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl<C: ChainClient> DirectTransactionSender<C> {
    pub const fn new(chain: Arc<C>, signer: PrivateKeySigner, chain_id: u64) -> Self {
        Self {
            chain,
            signer,
            chain_id,
        }
    }

    /// Address of the controlling key; transactions are sent from it.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub async fn send(
        &self,
        to: Address,
        call_data: Bytes,
        value: U256,
    ) -> Result<B256, DirectSendError> {
        let from = self.signer.address();
        let nonce = self
            .chain
            .transaction_count(from)
            .await
            .map_err(|e| self.classify(e))?;
        let gas_limit = self
            .chain
            .estimate_gas(from, to, call_data.clone(), value)
            .await
            .map_err(|e| self.classify(e))?;
        let (max_fee_per_gas, max_priority_fee_per_gas) = current_fees(self.chain.as_ref()).await;

        let mut tx = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to: TxKind::Call(to),
            value,
            access_list: Default::default(),
            input: call_data,
        };

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| DirectSendError::Signing(e.to_string()))?;
        let envelope = TxEnvelope::Eip1559(tx.into_signed(signature));

        let hash = self
            .chain
            .send_raw_transaction(envelope.encoded_2718().into())
            .await
            .map_err(|e| self.classify(e))?;

        info!(
            from = %from,
            to = %to,
            nonce = nonce,
            hash = %hash,
            "Broadcast direct transaction"
        );

        Ok(hash)
    }

    fn classify(&self, error: ChainError) -> DirectSendError {
        match error {
            ChainError::InsufficientFunds(message) => DirectSendError::InsufficientFunds {
                address: self.signer.address(),
                message,
            },
            other => DirectSendError::Submission(other.to_string()),
        }
    }
}
