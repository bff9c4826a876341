//! JSON-RPC relay client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to the network's relay (plus failovers)
//! - Resolve the operator account through the mirror node
//! - Submit signed transactions and fetch receipts
//! - Bound every call by the configured timeout
//!
//! # Submission
//! A signed transaction is sent to the next relay only when the previous
//! one could not be reached. After a timeout the first relay may already
//! hold it, so the timeout is returned instead. A relay that answers
//! `already known` has the transaction and the local hash is used.

use alloy::primitives::{keccak256, Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{TransportError, TransportResult};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::{Network, SignerConfig};
use crate::ledger::types::{AccountId, LedgerError, LedgerResult, Receipt};

/// Relay replies meaning the transaction is already in its pool.
const ALREADY_KNOWN_MESSAGES: [&str; 2] = ["already known", "known transaction"];

/// The network operations a signing run needs.
///
/// [`LedgerClient`] talks to a real relay; tests substitute a recorder.
pub trait Ledger {
    /// EVM address the account pays from.
    fn account_address(
        &self,
        account: AccountId,
    ) -> impl Future<Output = LedgerResult<Address>> + Send;

    /// Broadcast an EIP-2718 encoded signed transaction.
    fn submit(&self, raw: &[u8]) -> impl Future<Output = LedgerResult<TxHash>> + Send;

    /// Fetch the receipt, `None` while the transaction is pending.
    fn receipt(&self, hash: TxHash) -> impl Future<Output = LedgerResult<Option<Receipt>>> + Send;
}

/// Relay client for one network.
#[derive(Clone)]
pub struct LedgerClient {
    /// Primary relay first, then failovers.
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    urls: Vec<String>,
    http: reqwest::Client,
    mirror_url: String,
    network: Network,
    timeout_duration: Duration,
}

/// The part of a mirror node account record this client reads.
#[derive(Debug, Deserialize)]
struct MirrorAccount {
    evm_address: Option<String>,
}

impl LedgerClient {
    /// Build providers for the configured network.
    ///
    /// No request is made here; an unreachable relay surfaces on submit.
    pub fn for_network(config: &SignerConfig) -> LedgerResult<Self> {
        let mut urls = config.rpc_urls().into_iter();
        let mut providers = Vec::new();
        let mut accepted = Vec::new();

        // 1. Primary relay must be valid
        let primary = urls
            .next()
            .ok_or_else(|| LedgerError::Rpc("No relay URL configured".to_string()))?;
        let primary_url: url::Url = primary
            .parse()
            .map_err(|e| LedgerError::Rpc(format!("Invalid RPC URL '{}': {}", primary, e)))?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);
        accepted.push(primary);

        // 2. Failovers are best effort
        for url_str in urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => {
                    providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
                    accepted.push(url_str);
                }
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let timeout_duration = Duration::from_secs(config.rpc.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| LedgerError::Mirror(e.to_string()))?;

        tracing::info!(
            network = %config.network,
            rpc_url = %accepted[0],
            mirror_url = %config.mirror_url(),
            failovers = accepted.len() - 1,
            "Ledger client initialized"
        );

        Ok(Self {
            providers,
            urls: accepted,
            http,
            mirror_url: config.mirror_url(),
            network: config.network,
            timeout_duration,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Relay URLs in failover order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Run a read-only call against each provider until one answers.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, call: F) -> LedgerResult<T>
    where
        F: Fn(Arc<dyn Provider + Send + Sync>) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = LedgerError::Rpc(format!("No providers available for {}", method));

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                    last_error = LedgerError::Rpc(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                    last_error = LedgerError::Timeout(self.timeout_duration.as_secs());
                }
            }
        }

        Err(last_error)
    }
}

impl Ledger for LedgerClient {
    async fn account_address(&self, account: AccountId) -> LedgerResult<Address> {
        if let AccountId::Evm(address) = account {
            return Ok(address);
        }

        let url = format!("{}/api/v1/accounts/{}", self.mirror_url, account);
        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LedgerError::Timeout(self.timeout_duration.as_secs())
            } else {
                LedgerError::Mirror(e.to_string())
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::UnknownAccount(account));
        }
        let record: MirrorAccount = response
            .error_for_status()
            .map_err(|e| LedgerError::Mirror(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::Mirror(e.to_string()))?;

        let address = match record.evm_address.as_deref() {
            Some(evm) => evm
                .parse::<Address>()
                .map_err(|e| LedgerError::Mirror(format!("Invalid evm_address '{}': {}", evm, e)))?,
            None => account.evm_address(),
        };
        tracing::debug!(account = %account, address = %address, "Account resolved");
        Ok(address)
    }

    async fn submit(&self, raw: &[u8]) -> LedgerResult<TxHash> {
        let local_hash = keccak256(raw);
        let mut last_error =
            LedgerError::Rpc("No providers available for eth_sendRawTransaction".to_string());

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.send_raw_transaction(raw)).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) if is_already_known(&e) => {
                    tracing::info!(provider_idx = i, tx_hash = %local_hash, "Relay already has the transaction");
                    return Ok(local_hash);
                }
                Ok(Err(e)) if e.is_error_resp() => return Err(LedgerError::Rpc(e.to_string())),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "Relay unreachable, trying next provider");
                    last_error = LedgerError::Rpc(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(
                        provider_idx = i,
                        tx_hash = %local_hash,
                        "Submission timed out; not resending to another relay"
                    );
                    return Err(LedgerError::Timeout(self.timeout_duration.as_secs()));
                }
            }
        }

        Err(last_error)
    }

    async fn receipt(&self, hash: TxHash) -> LedgerResult<Option<Receipt>> {
        let receipt = self
            .with_failover("eth_getTransactionReceipt", |provider| async move {
                provider.get_transaction_receipt(hash).await
            })
            .await?;
        Ok(receipt.as_ref().map(Receipt::from))
    }
}

fn is_already_known(error: &TransportError) -> bool {
    error.as_error_resp().is_some_and(|payload| {
        let message = payload.message.to_ascii_lowercase();
        ALREADY_KNOWN_MESSAGES.iter().any(|known| message.contains(known))
    })
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("network", &self.network)
            .field("urls", &self.urls)
            .field("mirror_url", &self.mirror_url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
