//! Typed views over the on-chain collaborators: entry point, account
//! factory and sponsoring paymaster.
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256, aliases::U192};
use alloy_sol_types::SolCall;
use txflow_core::contracts::{IAccountFactory, IEntryPoint, ISponsorPaymaster};

use crate::chain::{ChainClient, ChainError};

fn decode_err(error: alloy_sol_types::Error) -> ChainError {
    ChainError::Decode(error.to_string())
}

/// Entry-point contract reads.
#[derive(Debug, Clone)]
pub struct EntryPointClient<C> {
    chain: Arc<C>,
    address: Address,
}

impl<C: ChainClient> EntryPointClient<C> {
    pub fn new(chain: Arc<C>, address: Address) -> Self {
        Self { chain, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    /// `getNonce(sender, 0)` — the pipeline only ever uses nonce key zero.
    pub async fn nonce(&self, sender: Address) -> Result<U256, ChainError> {
        let call = IEntryPoint::getNonceCall {
            sender,
            key: U192::ZERO,
        };
        let returned = self
            .chain
            .call(self.address, call.abi_encode().into())
            .await?;
        IEntryPoint::getNonceCall::abi_decode_returns(&returned).map_err(decode_err)
    }
}

/// Account-factory contract reads plus the create-call encoder.
#[derive(Debug, Clone)]
pub struct FactoryClient<C> {
    chain: Arc<C>,
    address: Address,
}

impl<C: ChainClient> FactoryClient<C> {
    pub fn new(chain: Arc<C>, address: Address) -> Self {
        Self { chain, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub async fn has_account(&self, owner: Address) -> Result<bool, ChainError> {
        let call = IAccountFactory::hasAccountCall { owner };
        let returned = self
            .chain
            .call(self.address, call.abi_encode().into())
            .await?;
        IAccountFactory::hasAccountCall::abi_decode_returns(&returned).map_err(decode_err)
    }

    pub async fn get_account(&self, owner: Address) -> Result<Address, ChainError> {
        let call = IAccountFactory::getAccountCall { owner };
        let returned = self
            .chain
            .call(self.address, call.abi_encode().into())
            .await?;
        IAccountFactory::getAccountCall::abi_decode_returns(&returned).map_err(decode_err)
    }

    pub async fn account_implementation(&self) -> Result<Address, ChainError> {
        let call = IAccountFactory::accountImplementationCall {};
        let returned = self
            .chain
            .call(self.address, call.abi_encode().into())
            .await?;
        IAccountFactory::accountImplementationCall::abi_decode_returns(&returned)
            .map_err(decode_err)
    }
}

/// Global sponsorship switches read from the paymaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsorshipFlags {
    pub sponsor_all_transactions: bool,
    pub sponsor_account_creation: bool,
}

impl SponsorshipFlags {
    pub const fn any_enabled(&self) -> bool {
        self.sponsor_all_transactions || self.sponsor_account_creation
    }
}

/// Per-account whitelist state on the paymaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistStatus {
    pub address: Address,
    pub all_transactions: bool,
    pub creation: bool,
}

/// Paymaster contract reads and whitelist-call encoders. Whitelist writes
/// go through the direct sender, so this client only produces calldata.
#[derive(Debug, Clone)]
pub struct PaymasterClient<C> {
    chain: Arc<C>,
    address: Address,
}

impl<C: ChainClient> PaymasterClient<C> {
    pub fn new(chain: Arc<C>, address: Address) -> Self {
        Self { chain, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub async fn sponsorship_flags(&self) -> Result<SponsorshipFlags, ChainError> {
        let all = self
            .chain
            .call(
                self.address,
                ISponsorPaymaster::sponsorAllTransactionsCall {}.abi_encode().into(),
            )
            .await?;
        let creation = self
            .chain
            .call(
                self.address,
                ISponsorPaymaster::sponsorAccountCreationCall {}.abi_encode().into(),
            )
            .await?;

        Ok(SponsorshipFlags {
            sponsor_all_transactions:
                ISponsorPaymaster::sponsorAllTransactionsCall::abi_decode_returns(&all)
                    .map_err(decode_err)?,
            sponsor_account_creation:
                ISponsorPaymaster::sponsorAccountCreationCall::abi_decode_returns(&creation)
                    .map_err(decode_err)?,
        })
    }

    pub async fn whitelist_status(&self, account: Address) -> Result<WhitelistStatus, ChainError> {
        let global = self
            .chain
            .call(
                self.address,
                ISponsorPaymaster::globalWhitelistCall { account }.abi_encode().into(),
            )
            .await?;
        let creation = self
            .chain
            .call(
                self.address,
                ISponsorPaymaster::creationWhitelistCall { account }.abi_encode().into(),
            )
            .await?;

        Ok(WhitelistStatus {
            address: account,
            all_transactions: ISponsorPaymaster::globalWhitelistCall::abi_decode_returns(&global)
                .map_err(decode_err)?,
            creation: ISponsorPaymaster::creationWhitelistCall::abi_decode_returns(&creation)
                .map_err(decode_err)?,
        })
    }

    /// The paymaster's deposit with the entry point; a zero deposit means it
    /// cannot actually sponsor anything.
    pub async fn entry_point_deposit(&self) -> Result<U256, ChainError> {
        let returned = self
            .chain
            .call(
                self.address,
                ISponsorPaymaster::getDepositCall {}.abi_encode().into(),
            )
            .await?;
        ISponsorPaymaster::getDepositCall::abi_decode_returns(&returned).map_err(decode_err)
    }

    pub fn add_to_global_whitelist_call(&self, account: Address) -> Bytes {
        ISponsorPaymaster::addToGlobalWhitelistCall { account }
            .abi_encode()
            .into()
    }

    pub fn add_to_creation_whitelist_call(&self, account: Address) -> Bytes {
        ISponsorPaymaster::addToCreationWhitelistCall { account }
            .abi_encode()
            .into()
    }
}
