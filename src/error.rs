//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;

/// Anything that can stop a signing run.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Writing progress or results failed.
    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_messages_are_unchanged() {
        let err: SignerError = ConfigError::InvalidNetwork("devnet".to_string()).into();
        assert_eq!(err.to_string(), "Invalid network: devnet");

        let err: SignerError = LedgerError::Timeout(5).into();
        assert_eq!(err.to_string(), "RPC timeout after 5 seconds");
    }
}
