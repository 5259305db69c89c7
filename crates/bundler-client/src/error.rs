//! Bundler failure taxonomy.
use thiserror::Error;

/// Failures talking to the bundler. `Unconfigured` is detected locally and
/// never touches the network; `Rpc` carries the bundler's own error member;
/// `Http` keeps the raw body of a non-2xx response for diagnostics.
#[derive(Debug, Error)]
pub enum BundlerError {
    #[error("bundler endpoint is unset or still a placeholder")]
    Unconfigured,

    #[error("bundler rejected the request (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("bundler returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("bundler transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed bundler response: {0}")]
    InvalidResponse(String),
}
