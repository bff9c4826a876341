//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (optional)         → loader.rs (merged into process env)
//! settings file (TOML)    → loader.rs (parse) → validation.rs
//! HEDERA_* variables      → loader.rs (presence + network checks)
//!     → SignerConfig (resolved, immutable)
//! ```
//!
//! # Design Decisions
//! - Private key and account ID come ONLY from the environment
//! - Everything is resolved before the first network call

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_env_file, load_file_config, ConfigError};
pub use schema::{FileConfig, Network, RpcConfig, SecretKey, SignerConfig};
