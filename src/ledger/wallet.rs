//! Operator credentials and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::consensus::{TxEnvelope, TypedTransaction};
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::config::{Network, SecretKey};
use crate::ledger::types::{AccountId, LedgerError, LedgerResult};

/// DER prefix of a secp256k1 private key as exported by the Hedera portal.
const ECDSA_DER_PREFIX: &str = "3030020100300706052b8104000a04220420";

/// DER prefix of an Ed25519 private key.
const ED25519_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// The account and key that authorize and pay for a transaction.
#[derive(Debug, Clone)]
pub struct Operator {
    account_id: AccountId,
    signer: PrivateKeySigner,
}

impl Operator {
    /// Bind a key to an account on the given network.
    ///
    /// # Arguments
    /// * `account_id` - Paying account
    /// * `private_key` - Raw or DER hex secp256k1 key, with or without 0x
    /// * `network` - Supplies the chain ID the signer enforces
    pub fn new(account_id: AccountId, private_key: &SecretKey, network: Network) -> LedgerResult<Self> {
        let key_hex = raw_key_hex(private_key.expose())?;

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| LedgerError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = signer.with_chain_id(Some(network.chain_id()));

        let operator = Self { account_id, signer };
        if let AccountId::Evm(address) = account_id {
            operator.confirm_payer(address)?;
        }

        tracing::info!(
            account = %account_id,
            address = %operator.address(),
            chain_id = network.chain_id(),
            "Operator set"
        );

        Ok(operator)
    }

    /// Check that the account's EVM address is the one the key signs as.
    ///
    /// The relay charges the account whose address recovers from the
    /// signature, so any other account would not be the one paying.
    pub fn confirm_payer(&self, address: Address) -> LedgerResult<()> {
        if address != self.signer.address() {
            return Err(LedgerError::OperatorMismatch {
                account: self.account_id,
                address,
                key: self.signer.address(),
            });
        }
        Ok(())
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Address transactions are signed from.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign an unsigned transaction.
    ///
    /// A transaction without a chain ID gets the operator's; one built for
    /// another chain is rejected.
    pub fn sign(&self, mut tx: TypedTransaction) -> LedgerResult<TxEnvelope> {
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| LedgerError::Signing(e.to_string()))?;
        Ok(tx.into_envelope(signature))
    }
}

fn raw_key_hex(key: &str) -> LedgerResult<&str> {
    let key = key.trim();
    let key = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);

    let lower = key.to_ascii_lowercase();
    if lower.starts_with(ED25519_DER_PREFIX) {
        return Err(LedgerError::Wallet(
            "Ed25519 keys cannot sign EVM transactions; use an ECDSA (secp256k1) key".to_string(),
        ));
    }
    if lower.starts_with(ECDSA_DER_PREFIX) {
        return Ok(&key[ECDSA_DER_PREFIX.len()..]);
    }
    Ok(key)
}
