//! Console prompts and banner.

use std::io::{self, BufRead, Write};

use crate::config::schema::{ACCOUNT_ID_ENV_VAR, NETWORK_ENV_VAR, PRIVATE_KEY_ENV_VAR};

/// Prompt shown before reading the transaction.
pub const TRANSACTION_PROMPT: &str = "Paste your base64-encoded transaction bytes here: ";

/// Write the tool banner.
pub fn banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Hedera Transaction Signer CLI ===")?;
    writeln!(
        out,
        "This tool signs and executes Hedera transactions using a private key from .env file"
    )?;
    writeln!(out, "Required .env variables:")?;
    writeln!(out, "  {} - Your private key", PRIVATE_KEY_ENV_VAR)?;
    writeln!(out, "  {} - Your account ID", ACCOUNT_ID_ENV_VAR)?;
    writeln!(
        out,
        "  {} - Network to use (testnet, mainnet, previewnet) - defaults to testnet",
        NETWORK_ENV_VAR
    )?;
    writeln!(out, "=================================")?;
    writeln!(out)
}

/// Write `query`, then block until one line is read.
///
/// The trailing line ending is removed. End of input yields an empty
/// string.
pub fn prompt<R: BufRead, W: Write>(query: &str, input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", query)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let trimmed_len = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(trimmed_len);
    Ok(line)
}
