//! Gas estimation for sponsored operations. Estimation failure never blocks
//! submission: the bundler re-validates gas at submit time, so any failure
//! here degrades to fixed defaults.
use std::sync::Arc;

use alloy_primitives::U256;
use tracing::{debug, warn};
use txflow_bundler_client::BundlerApi;
use txflow_core::{GasEstimate, UserOperation};

pub const DEFAULT_CALL_GAS_LIMIT: u64 = 100_000;
pub const DEFAULT_VERIFICATION_GAS_LIMIT: u64 = 100_000;
pub const DEFAULT_PRE_VERIFICATION_GAS: u64 = 50_000;

/// Conservative defaults used whenever the bundler cannot be asked.
pub fn default_estimate() -> GasEstimate {
    GasEstimate {
        call_gas_limit: U256::from(DEFAULT_CALL_GAS_LIMIT),
        verification_gas_limit: U256::from(DEFAULT_VERIFICATION_GAS_LIMIT),
        pre_verification_gas: U256::from(DEFAULT_PRE_VERIFICATION_GAS),
    }
}

/// Asks the bundler to estimate the three gas components of an operation.
#[derive(Debug, Clone)]
pub struct GasEstimator<B> {
    bundler: Arc<B>,
}

impl<B: BundlerApi> GasEstimator<B> {
    pub fn new(bundler: Arc<B>) -> Self {
        Self { bundler }
    }

    pub async fn estimate(&self, draft: &UserOperation) -> GasEstimate {
        if !self.bundler.is_configured() {
            debug!("Bundler not configured, using default gas estimate");
            return default_estimate();
        }

        // bundlers refuse to estimate an operation whose gas fields are
        // zero, so the probe carries the defaults in any still-empty slot
        let mut probe = draft.clone();
        let placeholder = GasEstimate {
            call_gas_limit: probe.call_gas_limit,
            verification_gas_limit: probe.verification_gas_limit,
            pre_verification_gas: probe.pre_verification_gas,
        }
        .floored_at(&default_estimate());
        probe.apply_gas_estimate(&placeholder);

        match self.bundler.estimate_user_operation_gas(&probe).await {
            Ok(estimate) => estimate.floored_at(&default_estimate()),
            Err(e) => {
                warn!(
                    sender = %draft.sender,
                    error = %e,
                    "Gas estimation failed, falling back to fixed defaults"
                );
                default_estimate()
            }
        }
    }
}
