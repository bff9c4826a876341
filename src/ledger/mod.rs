//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! SignerConfig (network, operator key + account)
//!     → client.rs (relay connection with timeouts, mirror account lookup)
//!     → wallet.rs (operator, signing)
//!     → transaction.rs (decode, sign, submit, receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{Ledger, LedgerClient};
pub use transaction::{execute, sign_and_submit};
pub use types::{AccountId, Execution, LedgerError, LedgerResult, Receipt, ReceiptStatus};
pub use wallet::Operator;
