//! Black-box tests of the binary. None of these reach the network.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Run the binary in `dir` with a clean HEDERA_* environment.
fn run_cli(dir: &Path, args: &[&str], envs: &[(&str, &str)], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hedera-tx-signer"))
        .current_dir(dir)
        .env_remove("HEDERA_PRIVATE_KEY")
        .env_remove("HEDERA_ACCOUNT_ID")
        .env_remove("HEDERA_NETWORK")
        .env("RUST_LOG", "off")
        .envs(envs.iter().copied())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_empty_input_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &[], &[], "   \n");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("=== Hedera Transaction Signer CLI ==="));
    assert!(stdout.contains("Paste your base64-encoded transaction bytes here: "));
    assert!(!stdout.contains("Signing transaction"));
    assert!(stderr.contains("No transaction bytes provided. Exiting."));
}

#[test]
fn test_closed_stdin_counts_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &[], &[], "");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_key_is_reported_and_exits_normally() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &[], &[], "AQID\n");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: HEDERA_PRIVATE_KEY not found"), "{}", stderr);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Using account"));
}

#[test]
fn test_invalid_network_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &[],
        &[
            ("HEDERA_PRIVATE_KEY", TEST_PRIVATE_KEY),
            ("HEDERA_ACCOUNT_ID", "0.0.1234"),
            ("HEDERA_NETWORK", "devnet"),
        ],
        "AQID\n",
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid network: devnet"), "{}", stderr);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Success!"));
}

#[test]
fn test_network_flag_is_checked() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &["--network", "Mainnet"],
        &[
            ("HEDERA_PRIVATE_KEY", TEST_PRIVATE_KEY),
            ("HEDERA_ACCOUNT_ID", "0.0.1234"),
        ],
        "AQID\n",
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid network: Mainnet"), "{}", stderr);
}

#[test]
fn test_env_file_supplies_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join("signer.env");
    std::fs::write(
        &env_path,
        format!(
            "HEDERA_PRIVATE_KEY={}\nHEDERA_ACCOUNT_ID=0.0.1234\nHEDERA_NETWORK=nowhere\n",
            TEST_PRIVATE_KEY
        ),
    )
    .unwrap();

    let output = run_cli(
        dir.path(),
        &["--env-file", env_path.to_str().unwrap()],
        &[],
        "AQID\n",
    );

    // The key and account came from the file, so the network check ran.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid network: nowhere"), "{}", stderr);
}

#[test]
fn test_dot_env_in_working_directory_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "HEDERA_PRIVATE_KEY=abc\n").unwrap();

    let output = run_cli(dir.path(), &[], &[], "AQID\n");

    // Key found, so the next presence check is the one that fails.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: HEDERA_ACCOUNT_ID not found"), "{}", stderr);
}

#[test]
fn test_invalid_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("signer.toml");
    std::fs::write(&config_path, "[rpc]\npoll_interval_ms = 0\n").unwrap();

    let output = run_cli(
        dir.path(),
        &["--config", config_path.to_str().unwrap()],
        &[],
        "AQID\n",
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rpc.poll_interval_ms"), "{}", stderr);
}
