//! Daemon lifecycle specs
//!
//! Verify startup, the single-instance lock, and config validation.

use crate::prelude::*;

#[test]
fn daemon_writes_pid_file_and_reports_ready() {
    let daemon = Daemon::start();

    let pid = std::fs::read_to_string(daemon.state.path().join("daemon.pid")).unwrap();
    assert!(pid.trim().parse::<u32>().is_ok(), "pid file: {pid:?}");
    assert!(daemon.terminal.starts_with("127.0.0.1:"));
    assert!(daemon.gateway.starts_with("127.0.0.1:"));
}

#[test]
fn second_daemon_on_same_state_dir_fails() {
    let daemon = Daemon::start();

    let output = daemon_command(daemon.state.path()).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already running"), "{stderr}");
}

#[test]
fn non_loopback_without_token_is_refused() {
    let state = TempDir::new().unwrap();

    let output = daemon_command(state.path())
        .env("CODEXI_GATEWAY_ADDR", "0.0.0.0:0")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CODEXI_AUTH_TOKEN"), "{stderr}");
    assert!(!state.path().join("daemon.pid").exists());
}

#[test]
fn daemon_start_launches_in_background() {
    let state = TempDir::new().unwrap();

    let run = cli()
        .env("CODEXI_DAEMON_BIN", codexid_bin())
        .env("CODEXI_STATE_DIR", state.path())
        .env("CODEXI_SESSION_ROOT", state.path().join("sessions"))
        .env("CODEXI_TERMINAL_ADDR", "127.0.0.1:0")
        .env("CODEXI_GATEWAY_ADDR", "127.0.0.1:0")
        .env("CODEXI_STORE", "memory")
        .args(&["-o", "json", "daemon", "start"])
        .passes();

    let ready: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let gateway = ready["gateway"].as_str().unwrap().to_string();
    cli()
        .env("CODEXI_GATEWAY_URL", format!("http://{gateway}"))
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("running");

    let pid = std::fs::read_to_string(state.path().join("daemon.pid")).unwrap();
    let _ = std::process::Command::new("kill").arg(pid.trim()).status();
}
