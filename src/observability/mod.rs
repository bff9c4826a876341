//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, ledger, cli
//!     → logging.rs (structured log events on stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
