//! Submission pipeline for sponsored (gasless) operations with a
//! direct-transaction fallback.
//!
//! Every component is constructed explicitly and wired by reference; there
//! is no global state. A submission flows through
//! [`router::TransactionRouter`], which tries the sponsored path (resolve
//! sender, assign nonce, estimate gas, submit to the bundler) and degrades
//! to an ordinary signed transaction on any sponsored-path failure.
pub mod account;
pub mod builder;
pub mod chain;
pub mod clients;
pub mod direct;
pub mod estimator;
mod fees;
pub mod metrics;
pub mod nonce;
pub mod router;
pub mod sponsorship;

pub use account::{AccountAddressResolver, ResolveError};
pub use builder::SponsoredOperationBuilder;
pub use chain::{ChainClient, ChainError, RpcChainClient};
pub use clients::{EntryPointClient, FactoryClient, PaymasterClient};
pub use direct::{DirectSendError, DirectTransactionSender};
pub use estimator::GasEstimator;
pub use nonce::NonceManager;
pub use router::{SubmitRequest, TransactionRouter};
pub use sponsorship::SponsorshipEnsurer;
