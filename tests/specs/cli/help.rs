//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn codexi_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("agent");
}

#[test]
fn codexi_run_help_shows_usage() {
    cli().args(&["run", "--help"]).passes().stdout_has("Usage:").stdout_has("--session");
}

#[test]
fn codexi_daemon_help_shows_subcommands() {
    cli().args(&["daemon", "--help"]).passes().stdout_has("start").stdout_has("status");
}

#[test]
fn codexi_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn codexid_version_shows_version() {
    let output = std::process::Command::new(codexid_bin()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("codexid 0.2"));
}

#[test]
fn unknown_role_is_rejected_before_any_request() {
    let run = cli()
        .env("CODEXI_GATEWAY_URL", "http://127.0.0.1:9")
        .args(&["agent", "janitor", "chat", "hi", "--provider", "openai", "--api-key", "k"])
        .fails()
        .stderr_has("Unsupported agent role: janitor");
    assert_eq!(run.code(), Some(2));
}

#[test]
fn missing_api_key_exits_2() {
    let run = cli().args(&["models", "--provider", "openai"]).fails().stderr_has("--api-key");
    assert_eq!(run.code(), Some(2));
}
