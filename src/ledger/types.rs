//! Ledger-facing types and error definitions.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionReceipt;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced while decoding, signing, submitting or confirming.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The paying account is not controlled by the configured key.
    #[error("Operator account {account} resolves to {address}, not key address {key}")]
    OperatorMismatch {
        account: AccountId,
        address: Address,
        key: Address,
    },

    /// The mirror node has no such account.
    #[error("Account {0} not found on the mirror node")]
    UnknownAccount(AccountId),

    #[error("Mirror node error: {0}")]
    Mirror(String),

    /// Settings that would make a step impossible to run.
    #[error("Invalid RPC settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid base64 transaction: {0}")]
    Decode(String),

    #[error("Invalid transaction bytes: {0}")]
    Deserialize(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt showed up in time.
    #[error("No receipt for transaction {transaction_id} after {secs} seconds")]
    ReceiptTimeout { transaction_id: TxHash, secs: u64 },

    /// The network reached consensus on a failure.
    #[error("Receipt for transaction {transaction_id} contained error status {status}")]
    ReceiptStatus {
        transaction_id: TxHash,
        status: ReceiptStatus,
    },
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Operator account identifier.
///
/// Accepts `shard.realm.num`, optionally followed by a `-abcde` checksum,
/// or a 20-byte hex EVM address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountId {
    Num { shard: u32, realm: u64, num: u64 },
    Evm(Address),
}

impl AccountId {
    /// EVM address of the account. Numeric IDs map to the long-zero form,
    /// which is what the mirror node reports for accounts without an alias.
    pub fn evm_address(&self) -> Address {
        match *self {
            AccountId::Evm(address) => address,
            AccountId::Num { shard, realm, num } => {
                let mut bytes = [0u8; 20];
                bytes[..4].copy_from_slice(&shard.to_be_bytes());
                bytes[4..12].copy_from_slice(&realm.to_be_bytes());
                bytes[12..].copy_from_slice(&num.to_be_bytes());
                Address::from(bytes)
            }
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Num { shard, realm, num } => write!(f, "{}.{}.{}", shard, realm, num),
            AccountId::Evm(address) => write!(f, "{}", address),
        }
    }
}

impl FromStr for AccountId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidAccountId {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if s.starts_with("0x") || s.starts_with("0X") {
            return s
                .parse::<Address>()
                .map(AccountId::Evm)
                .map_err(|e| invalid(&e.to_string()));
        }

        let entity = match s.split_once('-') {
            Some((entity, checksum)) => {
                if checksum.len() != 5 || !checksum.bytes().all(|b| b.is_ascii_lowercase()) {
                    return Err(invalid("checksum must be five lowercase letters"));
                }
                entity
            }
            None => s,
        };

        let parts: Vec<&str> = entity.split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(invalid("expected shard.realm.num"));
        };

        Ok(AccountId::Num {
            shard: shard.parse().map_err(|_| invalid("shard is not a number"))?,
            realm: realm.parse().map_err(|_| invalid("realm is not a number"))?,
            num: num.parse().map_err(|_| invalid("num is not a number"))?,
        })
    }
}

/// Final status reported by a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptStatus::Success => f.write_str("SUCCESS"),
            ReceiptStatus::Reverted => f.write_str("CONTRACT_REVERT_EXECUTED"),
        }
    }
}

/// The parts of a receipt this tool reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: TxHash,
    pub status: ReceiptStatus,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for Receipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_hash,
            status: if receipt.status() {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Reverted
            },
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// Outcome of a successful sign-and-submit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub transaction_id: TxHash,
    pub receipt: Receipt,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction executed with ID: {}\nStatus: {}",
            self.transaction_id, self.receipt.status
        )
    }
}
