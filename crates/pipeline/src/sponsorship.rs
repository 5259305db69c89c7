//! Best-effort paymaster whitelisting ahead of a submission. Everything in
//! here is advisory: failures are logged and swallowed because the address
//! may already be whitelisted by another actor, and the on-chain write is
//! idempotent anyway.
use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::chain::ChainClient;
use crate::clients::PaymasterClient;
use crate::direct::DirectTransactionSender;

/// Checks sponsorship flags and whitelists the address when needed.
#[derive(Debug, Clone)]
pub struct SponsorshipEnsurer<C> {
    paymaster: PaymasterClient<C>,
    sender: DirectTransactionSender<C>,
}

impl<C: ChainClient> SponsorshipEnsurer<C> {
    pub const fn new(paymaster: PaymasterClient<C>, sender: DirectTransactionSender<C>) -> Self {
        Self { paymaster, sender }
    }

    /// Make sure `account` is whitelisted for the widest enabled scope.
    /// Never fails; "already whitelisted"-class outcomes are benign.
    pub async fn ensure_whitelisted(&self, account: Address) {
        let flags = match self.paymaster.sponsorship_flags().await {
            Ok(flags) => flags,
            Err(e) => {
                warn!(error = %e, "Could not read sponsorship flags, skipping whitelist check");
                return;
            }
        };

        if !flags.any_enabled() {
            debug!("Sponsorship is disabled globally, nothing to whitelist");
            return;
        }

        match self.paymaster.entry_point_deposit().await {
            Ok(deposit) if deposit.is_zero() => {
                warn!(
                    paymaster = %self.paymaster.address(),
                    "Paymaster has no entry-point deposit and cannot sponsor operations"
                );
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Could not read paymaster deposit"),
        }

        let status = match self.paymaster.whitelist_status(account).await {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    account = %account,
                    error = %e,
                    "Could not read whitelist status, skipping whitelist write"
                );
                return;
            }
        };

        // widest enabled scope wins
        let call_data = if flags.sponsor_all_transactions {
            if status.all_transactions {
                debug!(account = %account, "Already whitelisted for all transactions");
                return;
            }
            self.paymaster.add_to_global_whitelist_call(account)
        } else {
            if status.creation {
                debug!(account = %account, "Already whitelisted for account creation");
                return;
            }
            self.paymaster.add_to_creation_whitelist_call(account)
        };

        match self
            .sender
            .send(self.paymaster.address(), call_data, U256::ZERO)
            .await
        {
            Ok(hash) => {
                info!(
                    account = %account,
                    all_transactions = flags.sponsor_all_transactions,
                    hash = %hash,
                    "Whitelisted account with paymaster"
                );
            }
            Err(e) => {
                warn!(
                    account = %account,
                    error = %e,
                    "Whitelist transaction failed, continuing (address may already be whitelisted)"
                );
            }
        }
    }
}
