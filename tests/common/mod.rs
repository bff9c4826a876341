//! Shared utilities for integration testing.

use alloy::consensus::{SignableTransaction, TxEip1559};
use alloy::primitives::{address, keccak256, Address, Signature, TxHash, TxKind, U256};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use hedera_tx_signer::config::{
    schema::{ACCOUNT_ID_ENV_VAR, NETWORK_ENV_VAR, PRIVATE_KEY_ENV_VAR},
    FileConfig, RpcConfig, SignerConfig,
};
use hedera_tx_signer::ledger::{
    sign_and_submit, AccountId, Execution, Ledger, LedgerError, LedgerResult, Receipt, ReceiptStatus,
};
use hedera_tx_signer::SignerError;

// Anvil's first account
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ACCOUNT_ID: &str = "0.0.1234";
pub const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// One observed ledger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Account(AccountId),
    Submit(Vec<u8>),
    Receipt(TxHash),
}

/// Ledger that records every call and replays scripted receipts.
///
/// Once the script runs out every poll returns `fallback`.
pub struct RecordingLedger {
    calls: Mutex<Vec<Call>>,
    receipts: Mutex<VecDeque<Option<ReceiptStatus>>>,
    fallback: Option<ReceiptStatus>,
    payer: Address,
    submit_error: Option<String>,
}

#[allow(dead_code)]
impl RecordingLedger {
    /// Confirms every transaction on the first poll.
    pub fn succeeding() -> Self {
        Self::scripted(Vec::new(), Some(ReceiptStatus::Success))
    }

    pub fn scripted(receipts: Vec<Option<ReceiptStatus>>, fallback: Option<ReceiptStatus>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            receipts: Mutex::new(receipts.into()),
            fallback,
            payer: TEST_ADDRESS,
            submit_error: None,
        }
    }

    pub fn failing_submit(message: &str) -> Self {
        Self {
            submit_error: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    /// Resolves every account to `payer`.
    pub fn paying_from(payer: Address) -> Self {
        Self {
            payer,
            ..Self::succeeding()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Ledger for RecordingLedger {
    async fn account_address(&self, account: AccountId) -> LedgerResult<Address> {
        self.calls.lock().unwrap().push(Call::Account(account));
        Ok(self.payer)
    }

    async fn submit(&self, raw: &[u8]) -> LedgerResult<TxHash> {
        self.calls.lock().unwrap().push(Call::Submit(raw.to_vec()));
        match &self.submit_error {
            Some(message) => Err(LedgerError::Rpc(message.clone())),
            None => Ok(keccak256(raw)),
        }
    }

    async fn receipt(&self, hash: TxHash) -> LedgerResult<Option<Receipt>> {
        self.calls.lock().unwrap().push(Call::Receipt(hash));
        let status = self
            .receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        Ok(status.map(|status| Receipt {
            transaction_id: hash,
            status,
            block_number: Some(42),
            gas_used: 21_000,
        }))
    }
}

/// Unsigned EIP-1559 transfer, base64 encoded.
pub fn unsigned_transfer(chain_id: u64) -> String {
    let tx = TxEip1559 {
        chain_id,
        nonce: 0,
        gas_limit: 21_000,
        max_fee_per_gas: 1_000_000_000_000,
        max_priority_fee_per_gas: 0,
        to: TxKind::Call(Address::repeat_byte(0x11)),
        value: U256::from(1u64),
        ..Default::default()
    };
    let mut buf = Vec::new();
    SignableTransaction::<Signature>::encode_for_signing(&tx, &mut buf);
    STANDARD.encode(buf)
}

/// Variables for a complete testnet operator.
pub fn operator_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        (PRIVATE_KEY_ENV_VAR, TEST_PRIVATE_KEY),
        (ACCOUNT_ID_ENV_VAR, TEST_ACCOUNT_ID),
        (NETWORK_ENV_VAR, "testnet"),
    ]
}

/// Fast polling so receipt tests finish quickly.
pub fn fast_rpc() -> RpcConfig {
    RpcConfig {
        receipt_timeout_secs: 1,
        poll_interval_ms: 20,
        ..RpcConfig::default()
    }
}

/// Resolve config from `vars` and run the signing sequence, like the binary.
pub async fn run(
    vars: &[(&str, &str)],
    ledger: &RecordingLedger,
    input: &str,
    progress: &mut Vec<u8>,
) -> Result<Execution, SignerError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let file = FileConfig {
        network: None,
        rpc: fast_rpc(),
    };
    let config = SignerConfig::resolve_with(|name| vars.get(name).cloned(), file, None)?;
    sign_and_submit(&config, ledger, input, progress).await
}
