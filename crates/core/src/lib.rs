//! Core primitives for the txflow submission pipeline: user-operation
//! types, contract bindings, sender resolution and the logging bootstrap.
pub mod contracts;
pub mod logger;
pub mod sender;
pub mod user_operation;

pub use sender::{PENDING_SENDER_PLACEHOLDER, SenderResolution};
pub use user_operation::{GasEstimate, UserOperation};
