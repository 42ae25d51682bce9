//! CLI integration tests
//!
//! These tests run the built binary and check:
//! - help and version output
//! - `discover` output formats
//! - fatal startup errors and exit codes

mod support;

use std::path::PathBuf;
use std::process::{Command, Output};
use support::{homelab_tree, write_file};
use tempfile::TempDir;

/// Path to the kumasync binary built for this test run
fn kumasync_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_kumasync"))
}

fn run(args: &[&str]) -> Output {
    Command::new(kumasync_bin())
        .args(args)
        .env_remove("KUMA_USERNAME")
        .env_remove("KUMA_PASSWORD")
        .env_remove("COMPOSE_DIR")
        .env_remove("DOMAIN")
        .env_remove("SYNC_INTERVAL")
        .env_remove("ONLY_INCLUDED")
        .env_remove("KUMASYNC_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute kumasync")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sync"));
    assert!(stdout.contains("discover"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_discover_json() {
    let tree = homelab_tree();
    let root = tree.path().to_str().unwrap();

    let output = run(&["discover", root, "--domain", "lab.io", "--format", "json", "-q"]);

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("discover should print JSON");
    assert_eq!(value["public"]["sonarr (public)"], "https://sonarr.lab.io");
    assert_eq!(value["backend"]["traefik (backend)"], "http://traefik:8080");
}

#[test]
fn test_discover_human() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "compose.yml",
        "services:\n  app:\n    labels:\n      homepage.href: https://app.example.com\n",
    );

    let output = run(&["discover", dir.path().to_str().unwrap(), "-q"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Public targets (1):"));
    assert!(stdout.contains("app (public)"));
}

#[test]
fn test_discover_missing_dir_fails() {
    let output = run(&["discover", "/nonexistent/compose/dir"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("COMPOSE_DIR does not exist"));
}

#[test]
fn test_sync_without_credentials_fails() {
    let dir = TempDir::new().unwrap();

    let output = run(&[
        "sync",
        "--once",
        "--compose-dir",
        dir.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("KUMA_USERNAME"));
}
