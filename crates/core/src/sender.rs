//! Resolution of the sponsored operation's sender address.
use alloy_primitives::{Address, Bytes, address};

/// Sender used when serializing an operation whose real address is still
/// pending bundler-side computation. Never a real account.
pub const PENDING_SENDER_PLACEHOLDER: Address =
    address!("ffffffffffffffffffffffffffffffffffffffff");

/// Outcome of resolving an owner to a smart-account sender.
///
/// The pending case is a first-class variant rather than a sentinel address
/// so callers cannot mistake an unresolved sender for a real one; only
/// serialization ever sees [`PENDING_SENDER_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderResolution {
    /// The factory reported an existing account.
    Deployed { address: Address },
    /// No account yet; the address was derived locally and `deployment_payload`
    /// will create it on first use.
    Counterfactual {
        address: Address,
        deployment_payload: Bytes,
    },
    /// No account yet and the address could not be derived locally; the
    /// bundler validates and computes the sender from the payload during
    /// estimation or submission.
    PendingBundlerComputation { deployment_payload: Bytes },
}

impl SenderResolution {
    /// The resolved address, if one is known locally.
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Deployed { address } | Self::Counterfactual { address, .. } => Some(*address),
            Self::PendingBundlerComputation { .. } => None,
        }
    }

    /// Address to place in the operation's `sender` field.
    pub fn sender_or_placeholder(&self) -> Address {
        self.address().unwrap_or(PENDING_SENDER_PLACEHOLDER)
    }

    /// Deployment payload for the operation's `init_code`; empty for a
    /// deployed account.
    pub fn deployment_payload(&self) -> Bytes {
        match self {
            Self::Deployed { .. } => Bytes::new(),
            Self::Counterfactual {
                deployment_payload, ..
            }
            | Self::PendingBundlerComputation { deployment_payload } => {
                deployment_payload.clone()
            }
        }
    }

    /// Whether the account already exists on-chain.
    pub const fn is_deployed(&self) -> bool {
        matches!(self, Self::Deployed { .. })
    }
}
