//! Integration tests for the marketview binary
//!
//! Commands run against a temporary cache directory and an unreachable API
//! endpoint, so only offline behavior is exercised.

use std::process::{Command, Output};
use tempfile::TempDir;

/// Endpoint nothing listens on, so every remote call fails fast
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/query";

/// Helper to run the CLI with given args and capture output
fn run_cli(cache_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_marketview"))
        .args(args)
        .arg("--cache-dir")
        .arg(cache_dir.path())
        .env("MARKETVIEW_BASE_URL", UNREACHABLE_URL)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute marketview")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = Command::new(env!("CARGO_BIN_EXE_marketview"))
        .arg("--help")
        .output()
        .expect("Failed to execute marketview");
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("marketview"));
    assert!(stdout.contains("movers"));
    assert!(stdout.contains("watchlist"));
}

#[test]
fn test_invalid_interval_prints_error_and_exits() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["intraday", "AAPL", "--interval", "2min"]);
    assert!(!output.status.success(), "Expected invalid interval to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid interval"),
        "Should print error message about invalid interval: {}",
        stderr
    );
}

#[test]
fn test_overview_falls_back_when_api_is_down() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["overview", "ZZZZ"]);
    assert!(output.status.success());

    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(payload["Symbol"], "ZZZZ");
    assert!(
        !dir.path().join("companyOverview_ZZZZ.json").exists(),
        "fallback data must not be cached"
    );
}

#[test]
fn test_quote_reports_error_when_api_is_down() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["quote", "AAPL"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("try again"));
    assert!(!dir.path().join("globalQuote_AAPL.json").exists());
}

#[test]
fn test_movers_prints_table_offline() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["movers"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Top gainers"));
    assert!(stdout.contains("AAPL"));
    assert!(stdout.contains("Top losers"));
}

#[test]
fn test_clear_cache_on_empty_directory() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["clear-cache"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed 0 cached entries"));
}

#[test]
fn test_watchlist_roundtrip() {
    let dir = TempDir::new().unwrap();

    let created = run_cli(&dir, &["watchlist", "create", "Tech"]);
    assert!(created.status.success());
    let stdout = String::from_utf8_lossy(&created.stdout).to_string();
    let id = stdout
        .trim()
        .rsplit(' ')
        .next()
        .expect("create should print the id")
        .to_string();

    assert!(run_cli(&dir, &["watchlist", "add", &id, "nvda"]).status.success());

    let listed = run_cli(&dir, &["watchlist", "list"]);
    let listing = String::from_utf8_lossy(&listed.stdout);
    assert!(listing.contains("Tech"));
    assert!(listing.contains("NVDA"));
}

#[test]
fn test_watchlist_remove_matches_added_ticker_case() {
    let dir = TempDir::new().unwrap();

    let created = run_cli(&dir, &["watchlist", "create", "Tech"]);
    let stdout = String::from_utf8_lossy(&created.stdout).to_string();
    let id = stdout.trim().rsplit(' ').next().unwrap().to_string();

    assert!(run_cli(&dir, &["watchlist", "add", &id, "nvda"]).status.success());
    let removed = run_cli(&dir, &["watchlist", "remove", &id, "nvda"]);
    assert!(removed.status.success());
    assert!(!String::from_utf8_lossy(&removed.stdout).contains("was not on watchlist"));

    let listed = run_cli(&dir, &["watchlist", "list"]);
    assert!(!String::from_utf8_lossy(&listed.stdout).contains("NVDA"));
}
