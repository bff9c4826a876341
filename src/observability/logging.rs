//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr so stdout carries only prompts and results
//! - Log level from `--log-level`, then `RUST_LOG`, then the default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither a flag nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "hedera_tx_signer=info";

/// Build the event filter.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid log level '{}': {}", level, e);
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    }
}

/// Initialize the global tracing subscriber.
pub fn init_logging(level: Option<&str>) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
