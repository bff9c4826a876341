//! Configuration loading from the environment, `.env` and disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{
    FileConfig, Network, SecretKey, SignerConfig, ACCOUNT_ID_ENV_VAR, NETWORK_ENV_VAR,
    PRIVATE_KEY_ENV_VAR,
};
use crate::config::validation::{validate_rpc, ValidationError};
use crate::ledger::types::AccountId;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("{0} not found in environment or .env file")]
    MissingVar(&'static str),

    /// Network name is not one of the known networks.
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Invalid account ID '{value}': {reason}")]
    InvalidAccountId { value: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load `.env` into the process environment.
///
/// Variables already set are left untouched. Without an explicit path a
/// missing `.env` is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}

/// Load and validate settings from a TOML file.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;

    validate_rpc(&config.rpc).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl SignerConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env(file: FileConfig, network_override: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve_with(|name| std::env::var(name).ok(), file, network_override)
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    ///
    /// Checks run in a fixed order: private key, account ID, network name,
    /// account ID syntax, RPC settings. Network precedence is the override, then
    /// `HEDERA_NETWORK`, then the file, then testnet.
    pub fn resolve_with<F>(
        lookup: F,
        file: FileConfig,
        network_override: Option<&str>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = required(&lookup, PRIVATE_KEY_ENV_VAR)?;
        let account_id = required(&lookup, ACCOUNT_ID_ENV_VAR)?;

        let network_name = network_override
            .map(str::to_string)
            .or_else(|| lookup(NETWORK_ENV_VAR).filter(|v| !v.is_empty()))
            .or(file.network)
            .unwrap_or_else(|| Network::default().as_str().to_string());
        let network: Network = network_name.parse()?;

        let account_id: AccountId = account_id.parse()?;

        validate_rpc(&file.rpc).map_err(ConfigError::Validation)?;

        Ok(Self {
            network,
            account_id,
            private_key: SecretKey::new(private_key),
            rpc: file.rpc,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
