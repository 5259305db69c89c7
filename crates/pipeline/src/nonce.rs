//! Sequence-number assignment for a sender, with a fail-soft fallback chain.
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::{debug, warn};
use txflow_bundler_client::BundlerApi;

use crate::chain::ChainClient;
use crate::clients::EntryPointClient;

/// Resolves the nonce for a sender. Never fails: a wrong nonce is cheaper to
/// let the bundler reject than to block submission on, so every query
/// failure degrades one step (entry point, then bundler, then zero).
#[derive(Debug, Clone)]
pub struct NonceManager<C, B> {
    entry_point: EntryPointClient<C>,
    bundler: Arc<B>,
}

impl<C: ChainClient, B: BundlerApi> NonceManager<C, B> {
    pub fn new(entry_point: EntryPointClient<C>, bundler: Arc<B>) -> Self {
        Self {
            entry_point,
            bundler,
        }
    }

    pub async fn nonce_for(&self, sender: Address, deployed: bool) -> U256 {
        if !deployed {
            // nothing on-chain to query yet
            debug!(sender = %sender, "Account not deployed, nonce is 0");
            return U256::ZERO;
        }

        match self.entry_point.nonce(sender).await {
            Ok(nonce) => nonce,
            Err(e) => {
                warn!(
                    sender = %sender,
                    error = %e,
                    "Entry-point nonce query failed, asking the bundler for the operation count"
                );
                match self.bundler.get_user_operation_count(sender).await {
                    Ok(count) => count,
                    Err(e) => {
                        warn!(
                            sender = %sender,
                            error = %e,
                            "Bundler operation count failed, submitting with nonce 0"
                        );
                        U256::ZERO
                    }
                }
            }
        }
    }
}
