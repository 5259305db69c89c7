//! Resolution of an owner to its smart-account sender: existing account,
//! locally-derived counterfactual address, or bundler-deferred derivation.
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, U256};
use thiserror::Error;
use tracing::{debug, warn};
use txflow_core::SenderResolution;
use txflow_core::contracts::{counterfactual_address, encode_deployment_payload};

use crate::chain::{ChainClient, ChainError};
use crate::clients::FactoryClient;

/// Failures resolving a sender. Both variants are fatal for the sponsored
/// path; the router answers them by falling back to a direct transaction.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("account factory query failed: {0}")]
    Factory(#[from] ChainError),

    #[error("account implementation is unset on factory {factory}")]
    AddressComputationFailure { factory: Address },
}

/// Read-only resolver over the account factory.
#[derive(Debug, Clone)]
pub struct AccountAddressResolver<C> {
    factory: FactoryClient<C>,
}

impl<C: ChainClient> AccountAddressResolver<C> {
    pub const fn new(factory: FactoryClient<C>) -> Self {
        Self { factory }
    }

    /// Resolve `owner` to a sender.
    ///
    /// Without an explicit `salt` a time-derived one is generated once and
    /// used for both the deployment payload and the address derivation, so
    /// the two always agree.
    pub async fn resolve(
        &self,
        owner: Address,
        salt: Option<U256>,
    ) -> Result<SenderResolution, ResolveError> {
        if self.factory.has_account(owner).await? {
            let address = self.factory.get_account(owner).await?;
            debug!(owner = %owner, account = %address, "Factory reports an existing account");
            return Ok(SenderResolution::Deployed { address });
        }

        let salt = salt.unwrap_or_else(time_salt);
        let deployment_payload = encode_deployment_payload(self.factory.address(), owner, salt);

        match self.factory.account_implementation().await {
            Ok(implementation) if implementation.is_zero() => {
                Err(ResolveError::AddressComputationFailure {
                    factory: self.factory.address(),
                })
            }
            Ok(implementation) => {
                let address =
                    counterfactual_address(self.factory.address(), implementation, owner, salt);
                debug!(
                    owner = %owner,
                    account = %address,
                    salt = %salt,
                    "Derived counterfactual account address"
                );
                Ok(SenderResolution::Counterfactual {
                    address,
                    deployment_payload,
                })
            }
            Err(e) => {
                warn!(
                    owner = %owner,
                    factory = %self.factory.address(),
                    error = %e,
                    "Factory does not answer accountImplementation, deferring sender derivation to the bundler"
                );
                Ok(SenderResolution::PendingBundlerComputation { deployment_payload })
            }
        }
    }
}

fn time_salt() -> U256 {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    U256::from(seconds)
}
