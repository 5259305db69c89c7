//! JSON-RPC client for an ERC-4337 bundler service.
pub mod client;
pub mod error;

pub use client::{BundlerApi, HttpBundlerClient, endpoint_is_placeholder};
pub use error::BundlerError;
