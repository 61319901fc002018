//! Gateway command specs
//!
//! Exercise the vendor gateway paths that never leave the machine.

use crate::prelude::*;

#[test]
fn anthropic_models_are_listed_without_network() {
    let daemon = Daemon::start();

    daemon
        .codexi()
        .args(&["models", "--provider", "anthropic", "--api-key", "k"])
        .passes()
        .stdout_has("claude");
}

#[test]
fn unsupported_provider_is_reported() {
    let daemon = Daemon::start();

    let run = daemon
        .codexi()
        .args(&["chat", "--provider", "unknown", "--api-key", "x", "hi"])
        .fails()
        .stderr_has("Unsupported provider");
    assert_eq!(run.code(), Some(1));
}

#[test]
fn daemon_status_reports_running() {
    let daemon = Daemon::start();

    daemon.codexi().args(&["daemon", "status"]).passes().stdout_has("Status: running");
    cli()
        .env("CODEXI_GATEWAY_URL", "http://127.0.0.1:9")
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}
