//! Logging bootstrap shared by the binaries.
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logger(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
