//! Assembly of the sponsored-operation draft from sender resolution, nonce
//! and current fee levels. Gas estimation and signing happen later in the
//! router so callers can merge estimation into the submit step.
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;
use txflow_bundler_client::BundlerApi;
use txflow_core::contracts::encode_execute_call;
use txflow_core::{SenderResolution, UserOperation};

use crate::account::{AccountAddressResolver, ResolveError};
use crate::chain::ChainClient;
use crate::fees::current_fees;
use crate::nonce::NonceManager;

/// Builds unsigned, unestimated operation drafts.
#[derive(Debug, Clone)]
pub struct SponsoredOperationBuilder<C, B> {
    resolver: AccountAddressResolver<C>,
    nonces: NonceManager<C, B>,
    chain: Arc<C>,
    paymaster: Address,
}

impl<C: ChainClient, B: BundlerApi> SponsoredOperationBuilder<C, B> {
    pub fn new(
        resolver: AccountAddressResolver<C>,
        nonces: NonceManager<C, B>,
        chain: Arc<C>,
        paymaster: Address,
    ) -> Self {
        Self {
            resolver,
            nonces,
            chain,
            paymaster,
        }
    }

    /// Assemble a draft operation executing `call_data` (with optional
    /// native `value`) against `target` through the owner's smart account.
    /// Gas fields stay zero and the signature stays empty.
    pub async fn build(
        &self,
        owner: Address,
        target: Address,
        call_data: Bytes,
        value: U256,
        paymaster_data: Option<Bytes>,
    ) -> Result<(UserOperation, SenderResolution), ResolveError> {
        let resolution = self.resolver.resolve(owner, None).await?;
        let sender = resolution.sender_or_placeholder();
        let nonce = self.nonces.nonce_for(sender, resolution.is_deployed()).await;
        let (max_fee, max_priority) = current_fees(self.chain.as_ref()).await;

        let operation = UserOperation {
            sender,
            nonce,
            init_code: resolution.deployment_payload(),
            call_data: encode_execute_call(target, value, call_data),
            call_gas_limit: U256::ZERO,
            verification_gas_limit: U256::ZERO,
            pre_verification_gas: U256::ZERO,
            max_fee_per_gas: U256::from(max_fee),
            max_priority_fee_per_gas: U256::from(max_priority),
            paymaster_and_data: self.paymaster_and_data(paymaster_data),
            signature: Bytes::new(),
        };

        debug!(
            sender = %operation.sender,
            nonce = %operation.nonce,
            deployed = resolution.is_deployed(),
            target = %target,
            "Assembled sponsored operation draft"
        );

        Ok((operation, resolution))
    }

    /// Paymaster address followed by any sponsor-specific data; empty when
    /// no paymaster is configured (self-funded operation).
    fn paymaster_and_data(&self, extra: Option<Bytes>) -> Bytes {
        if self.paymaster.is_zero() {
            return Bytes::new();
        }
        let mut data = self.paymaster.to_vec();
        if let Some(extra) = extra {
            data.extend_from_slice(&extra);
        }
        data.into()
    }
}
