//! Orchestration of a submission: best-effort whitelisting, then the
//! sponsored path when the caller opted in, then the direct fallback. Only
//! a direct-path failure ever reaches the caller.
use std::sync::Arc;
use std::time::Instant;

use alloy_primitives::{Address, B256, Bytes, U256};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use txflow_bundler_client::{BundlerApi, BundlerError};

use crate::account::ResolveError;
use crate::builder::SponsoredOperationBuilder;
use crate::chain::ChainClient;
use crate::direct::{DirectSendError, DirectTransactionSender};
use crate::estimator::GasEstimator;
use crate::metrics::PipelineMetrics;
use crate::sponsorship::SponsorshipEnsurer;

/// One state-changing call to submit.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Controlling key's address; owns the smart account on the sponsored
    /// path and is whitelisted with the paymaster.
    pub owner: Address,
    /// Contract the call targets.
    pub target: Address,
    /// ABI-encoded call against `target`.
    pub call_data: Bytes,
    /// Native value to forward with the call.
    pub value: U256,
    /// Whether to attempt the sponsored path at all.
    pub gasless: bool,
    /// Extra sponsor data appended after the paymaster address.
    pub paymaster_data: Option<Bytes>,
}

/// Anything that ends the sponsored attempt; every variant falls back.
#[derive(Debug, Error)]
enum SponsoredError {
    #[error("sender resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Bundler(#[from] BundlerError),
}

/// Routes submissions through the sponsored or direct path.
#[derive(Debug)]
pub struct TransactionRouter<C, B> {
    ensurer: SponsorshipEnsurer<C>,
    builder: SponsoredOperationBuilder<C, B>,
    estimator: GasEstimator<B>,
    bundler: Arc<B>,
    direct: DirectTransactionSender<C>,
    metrics: PipelineMetrics,
}

impl<C: ChainClient, B: BundlerApi> TransactionRouter<C, B> {
    pub fn new(
        ensurer: SponsorshipEnsurer<C>,
        builder: SponsoredOperationBuilder<C, B>,
        estimator: GasEstimator<B>,
        bundler: Arc<B>,
        direct: DirectTransactionSender<C>,
    ) -> Self {
        Self {
            ensurer,
            builder,
            estimator,
            bundler,
            direct,
            metrics: PipelineMetrics::default(),
        }
    }

    /// Submit a call; returns the operation hash (sponsored path) or the
    /// transaction hash (direct path). Both mean "submission accepted".
    pub async fn submit(&self, request: SubmitRequest) -> Result<B256, DirectSendError> {
        let started = Instant::now();

        // best-effort, never blocks the submission
        self.ensurer.ensure_whitelisted(request.owner).await;

        if request.gasless {
            match self.try_sponsored(&request).await {
                Ok(hash) => {
                    self.metrics.sponsored_submitted.increment(1);
                    self.metrics
                        .submit_duration
                        .record(started.elapsed().as_secs_f64());
                    info!(hash = %hash, owner = %request.owner, "Submitted sponsored operation");
                    return Ok(hash);
                }
                Err(e) => {
                    self.metrics.sponsored_fallbacks.increment(1);
                    warn!(
                        owner = %request.owner,
                        error = %e,
                        "Sponsored path failed, falling back to a direct transaction"
                    );
                }
            }
        }

        let result = self
            .direct
            .send(request.target, request.call_data.clone(), request.value)
            .await;

        match &result {
            Ok(hash) => {
                self.metrics.direct_submitted.increment(1);
                info!(hash = %hash, target = %request.target, "Submitted direct transaction");
            }
            Err(e) => {
                self.metrics.direct_failed.increment(1);
                error!(target = %request.target, error = %e, "Direct transaction failed");
            }
        }
        self.metrics
            .submit_duration
            .record(started.elapsed().as_secs_f64());

        result
    }

    async fn try_sponsored(&self, request: &SubmitRequest) -> Result<B256, SponsoredError> {
        let (mut operation, resolution) = self
            .builder
            .build(
                request.owner,
                request.target,
                request.call_data.clone(),
                request.value,
                request.paymaster_data.clone(),
            )
            .await?;

        if operation.needs_gas_estimation() {
            let estimate = self.estimator.estimate(&operation).await;
            operation.apply_gas_estimate(&estimate);
        }

        // The signature stays empty: the sponsoring validation path accepts
        // a placeholder. A signer integration would sign
        // `operation.user_op_hash(entry_point, chain_id)` here.
        let hash = self.bundler.send_user_operation(&operation).await?;

        debug!(
            sender = %operation.sender,
            nonce = %operation.nonce,
            deployed = resolution.is_deployed(),
            "Bundler accepted operation"
        );

        Ok(hash)
    }
}
