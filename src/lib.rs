//! Hedera transaction signer library.
//!
//! Reads a base64-encoded unsigned transaction, signs it with the
//! operator key and submits it to the selected Hedera network through
//! its JSON-RPC relay.

pub mod config;
pub mod console;
pub mod error;
pub mod ledger;
pub mod observability;

pub use config::{Network, SignerConfig};
pub use error::SignerError;
pub use ledger::{execute, sign_and_submit, Execution, Ledger, LedgerClient};
