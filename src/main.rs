//! Hedera Transaction Signer CLI
//!
//! Reads one base64-encoded unsigned transaction from stdin, signs it with
//! the operator key from the environment and submits it to the selected
//! Hedera network.
//!
//! ```text
//!   stdin ──▶ console::prompt ──▶ ledger::execute ──▶ stdout
//!                                   │
//!            env / .env / TOML ─────┘ config::SignerConfig
//! ```

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use hedera_tx_signer::config::{load_env_file, load_file_config, FileConfig, SignerConfig};
use hedera_tx_signer::console::{self, TRANSACTION_PROMPT};
use hedera_tx_signer::error::SignerError;
use hedera_tx_signer::ledger::{self, Execution};
use hedera_tx_signer::observability;

#[derive(Parser)]
#[command(name = "hedera-tx-signer")]
#[command(about = "Sign and execute a base64-encoded Hedera transaction", long_about = None)]
struct Cli {
    /// Network to use; overrides HEDERA_NETWORK
    #[arg(short, long)]
    network: Option<String>,

    /// TOML file with RPC settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Env file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "hedera_tx_signer=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    observability::init_logging(cli.log_level.as_deref());

    let mut stdout = io::stdout();
    console::banner(&mut stdout)?;

    let line = console::prompt(TRANSACTION_PROMPT, &mut io::stdin().lock(), &mut stdout)?;
    let input = line.trim();
    if input.is_empty() {
        eprintln!("No transaction bytes provided. Exiting.");
        std::process::exit(1);
    }

    match run(&cli, input, &mut stdout).await {
        Ok(execution) => {
            writeln!(stdout, "\nSuccess!")?;
            writeln!(stdout, "{}", execution)?;
        }
        Err(e) => {
            tracing::error!(error = %e, "Error signing transaction");
            eprintln!("\nError: {}", e);
        }
    }

    Ok(())
}

async fn run<W: Write>(cli: &Cli, input: &str, out: &mut W) -> Result<Execution, SignerError> {
    if let Some(path) = load_env_file(cli.env_file.as_deref())? {
        tracing::debug!(path = %path.display(), "Loaded env file");
    }

    let file = match &cli.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let config = SignerConfig::from_env(file, cli.network.as_deref())?;
    tracing::info!(
        network = %config.network,
        account = %config.account_id,
        "Configuration loaded"
    );

    ledger::execute(&config, input, out).await
}
