//! Fee-level reads shared by the operation builder and the direct sender.
use tracing::warn;

use crate::chain::ChainClient;

/// Floor for the priority fee when the network does not suggest one.
pub(crate) const MIN_PRIORITY_FEE_WEI: u128 = 1_000_000_000;

/// Current `(max_fee_per_gas, max_priority_fee_per_gas)` in wei.
pub(crate) async fn current_fees<C: ChainClient>(chain: &C) -> (u128, u128) {
    let priority = match chain.max_priority_fee_per_gas().await {
        Ok(fee) if fee > 0 => fee,
        _ => MIN_PRIORITY_FEE_WEI,
    };

    let max_fee = match chain.gas_price().await {
        Ok(price) => price.max(priority),
        Err(e) => {
            warn!(error = %e, "Gas price query failed, using the priority-fee floor");
            priority
        }
    };

    (max_fee, priority)
}
