//! Configuration schema definitions.
//!
//! Secrets (operator key and account) only ever come from environment
//! variables. The optional TOML file carries network and RPC tuning.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::loader::ConfigError;
use crate::ledger::types::AccountId;

/// Environment variable holding the operator private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "HEDERA_PRIVATE_KEY";

/// Environment variable holding the operator account ID.
pub const ACCOUNT_ID_ENV_VAR: &str = "HEDERA_ACCOUNT_ID";

/// Environment variable selecting the network.
pub const NETWORK_ENV_VAR: &str = "HEDERA_NETWORK";

/// Hedera network the transaction is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Previewnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Previewnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Previewnet => "previewnet",
        }
    }

    /// Public JSON-RPC relay for this network.
    pub fn relay_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet.hashio.io/api",
            Network::Testnet => "https://testnet.hashio.io/api",
            Network::Previewnet => "https://previewnet.hashio.io/api",
        }
    }

    /// Public mirror node REST API, used to look up accounts.
    pub fn mirror_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
            Network::Testnet => "https://testnet.mirrornode.hedera.com",
            Network::Previewnet => "https://previewnet.mirrornode.hedera.com",
        }
    }

    /// EIP-155 chain ID served by the relay.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 295,
            Network::Testnet => 296,
            Network::Previewnet => 297,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidNetwork(s.to_string()))
    }
}

/// RPC tuning.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RpcConfig {
    /// Relay URL override. Falls back to the network's public relay.
    pub url: Option<String>,

    /// Failover relay URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Mirror node override. Falls back to the network's public mirror.
    pub mirror_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// How long to wait for a receipt after submission.
    pub receipt_timeout_secs: u64,

    /// Delay between receipt polls.
    pub poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: None,
            failover_urls: Vec::new(),
            mirror_url: None,
            timeout_secs: 10,
            receipt_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// Contents of the optional TOML settings file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    /// Network name, checked the same way as `HEDERA_NETWORK`.
    pub network: Option<String>,

    pub rpc: RpcConfig,
}

/// Operator private key. Never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Fully resolved configuration for one signing run.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    pub network: Network,
    pub account_id: AccountId,
    pub private_key: SecretKey,
    pub rpc: RpcConfig,
}

impl SignerConfig {
    /// Relay URLs in the order they are tried.
    pub fn rpc_urls(&self) -> Vec<String> {
        let primary = self
            .rpc
            .url
            .clone()
            .unwrap_or_else(|| self.network.relay_url().to_string());
        std::iter::once(primary)
            .chain(self.rpc.failover_urls.iter().cloned())
            .collect()
    }

    /// Mirror node base URL without a trailing slash.
    pub fn mirror_url(&self) -> String {
        self.rpc
            .mirror_url
            .as_deref()
            .unwrap_or(self.network.mirror_url())
            .trim_end_matches('/')
            .to_string()
    }
}
