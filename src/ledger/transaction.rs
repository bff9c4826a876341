//! Decode, sign, submit and confirm one transaction.
//!
//! # Sequence
//! ```text
//! operator → base64 decode → deserialize → sign → payer check → submit → receipt
//! ```
//! Each step writes one progress line; the first error ends the run.

use alloy::consensus::TypedTransaction;
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::TxHash;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::config::{RpcConfig, SignerConfig};
use crate::error::SignerError;
use crate::ledger::client::{Ledger, LedgerClient};
use crate::ledger::types::{Execution, LedgerError, LedgerResult, Receipt, ReceiptStatus};
use crate::ledger::wallet::Operator;

/// Decode the pasted base64 text.
pub fn decode_base64(input: &str) -> LedgerResult<Vec<u8>> {
    STANDARD
        .decode(input.trim())
        .map_err(|e| LedgerError::Decode(e.to_string()))
}

/// First byte of a Hedera SDK `TransactionList` (field 1, length-delimited).
const PROTOBUF_TRANSACTION_LIST_TAG: u8 = 0x0a;

/// Parse an unsigned EIP-2718 transaction.
///
/// Trailing bytes after the transaction are rejected.
pub fn deserialize(bytes: &[u8]) -> LedgerResult<TypedTransaction> {
    if bytes.first() == Some(&PROTOBUF_TRANSACTION_LIST_TAG) {
        return Err(LedgerError::Deserialize(
            "looks like Hedera SDK protobuf bytes; only unsigned EVM (EIP-2718) transactions \
             can be signed through the JSON-RPC relay"
                .to_string(),
        ));
    }

    let mut buf = bytes;
    let tx = TypedTransaction::decode_unsigned(&mut buf)
        .map_err(|e| LedgerError::Deserialize(e.to_string()))?;
    if !buf.is_empty() {
        return Err(LedgerError::Deserialize(format!(
            "{} trailing bytes after transaction",
            buf.len()
        )));
    }
    Ok(tx)
}

/// Poll for a receipt until one arrives or the receipt timeout passes.
pub async fn wait_for_receipt<L: Ledger>(
    ledger: &L,
    transaction_id: TxHash,
    rpc: &RpcConfig,
) -> LedgerResult<Receipt> {
    if rpc.poll_interval_ms == 0 {
        return Err(LedgerError::InvalidSettings(
            "poll_interval_ms must be greater than 0".to_string(),
        ));
    }
    let poll_interval = Duration::from_millis(rpc.poll_interval_ms);
    let timeout_duration = Duration::from_secs(rpc.receipt_timeout_secs);

    match timeout(timeout_duration, poll_receipt(ledger, transaction_id, poll_interval)).await {
        Ok(receipt) => receipt,
        Err(_) => Err(LedgerError::ReceiptTimeout {
            transaction_id,
            secs: rpc.receipt_timeout_secs,
        }),
    }
}

async fn poll_receipt<L: Ledger>(
    ledger: &L,
    transaction_id: TxHash,
    poll_interval: Duration,
) -> LedgerResult<Receipt> {
    let mut ticker = interval(poll_interval);

    loop {
        ticker.tick().await;

        match ledger.receipt(transaction_id).await? {
            Some(receipt) => return Ok(receipt),
            None => tracing::debug!(transaction_id = %transaction_id, "Transaction pending"),
        }
    }
}

/// Sign the base64 transaction as the configured operator and submit it.
///
/// Steps run strictly in order and each is attempted once. A receipt
/// with a non-success status is returned as an error.
pub async fn sign_and_submit<L, W>(
    config: &SignerConfig,
    ledger: &L,
    input: &str,
    progress: &mut W,
) -> Result<Execution, SignerError>
where
    L: Ledger,
    W: Write,
{
    let operator = Operator::new(config.account_id, &config.private_key, config.network)?;
    writeln!(progress, "Using account: {} on {}", operator.account_id(), config.network)?;

    writeln!(progress, "Converting base64 transaction to bytes...")?;
    let bytes = decode_base64(input)?;

    writeln!(progress, "Deserializing transaction...")?;
    let tx = deserialize(&bytes)?;
    tracing::debug!(tx_type = ?tx.tx_type(), len = bytes.len(), "Transaction decoded");

    writeln!(progress, "Signing transaction...")?;
    let signed = operator.sign(tx)?;
    let local_hash = *signed.tx_hash();

    writeln!(progress, "Executing transaction...")?;
    let payer = ledger.account_address(*operator.account_id()).await?;
    operator.confirm_payer(payer)?;
    let transaction_id = ledger.submit(&signed.encoded_2718()).await?;
    if transaction_id != local_hash {
        tracing::warn!(
            relay_hash = %transaction_id,
            local_hash = %local_hash,
            "Relay returned a different transaction hash"
        );
    }
    tracing::info!(transaction_id = %transaction_id, "Transaction submitted");

    writeln!(progress, "Getting transaction receipt...")?;
    let receipt = wait_for_receipt(ledger, transaction_id, &config.rpc).await?;
    tracing::info!(
        transaction_id = %transaction_id,
        status = %receipt.status,
        block_number = ?receipt.block_number,
        gas_used = receipt.gas_used,
        "Receipt received"
    );

    if receipt.status != ReceiptStatus::Success {
        return Err(LedgerError::ReceiptStatus {
            transaction_id,
            status: receipt.status,
        }
        .into());
    }

    Ok(Execution {
        transaction_id,
        receipt,
    })
}

/// Build the relay client for the configured network and run
/// [`sign_and_submit`] against it.
pub async fn execute<W: Write>(
    config: &SignerConfig,
    input: &str,
    progress: &mut W,
) -> Result<Execution, SignerError> {
    let client = LedgerClient::for_network(config)?;
    sign_and_submit(config, &client, input, progress).await
}
