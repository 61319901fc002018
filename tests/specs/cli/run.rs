//! `codexi run` specs
//!
//! Drive a real daemon through the one-shot terminal client.

use crate::prelude::*;

#[test]
fn run_echo_prints_stdout() {
    let daemon = Daemon::start();

    daemon
        .codexi()
        .args(&["run", "--session", "s1", "--project", "p1", "--", "echo", "hello"])
        .passes()
        .stdout_has("hello");

    assert!(daemon.sessions_dir().join("codexi-session-s1").is_dir());
}

#[test]
fn run_json_output_is_command_result() {
    let daemon = Daemon::start();

    let stdout = daemon
        .codexi()
        .args(&["-o", "json", "run", "--session", "s1", "--project", "p1", "--", "echo", "hi"])
        .passes()
        .stdout();

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["command"], "echo hi");
    assert_eq!(result["stdout"], "hi\n");
    assert_eq!(result["exit_code"], 0);
    assert_eq!(result["success"], true);
}

#[test]
fn remote_exit_code_is_mirrored() {
    let daemon = Daemon::start();

    let run = daemon
        .codexi()
        .args(&["run", "--session", "s1", "--project", "p1", "--", "false"])
        .fails();

    assert_eq!(run.code(), Some(1));
}

#[test]
fn disallowed_command_is_reported() {
    let daemon = Daemon::start();

    daemon
        .codexi()
        .args(&["run", "--session", "s1", "--project", "p1", "--", "curl", "example.com"])
        .fails()
        .stderr_has("command not allowed: curl");
}

#[test]
fn files_persist_within_a_session_until_closed() {
    let daemon = Daemon::start();
    let session = daemon.sessions_dir().join("codexi-session-work");

    daemon
        .codexi()
        .args(&["run", "-s", "work", "--project", "p1", "--cwd", "src", "--", "touch", "a.txt"])
        .passes();
    assert!(session.join("src/a.txt").exists());

    daemon
        .codexi()
        .args(&["run", "-s", "work", "--project", "p1", "--close", "--", "ls", "src"])
        .passes()
        .stdout_has("a.txt");
    assert!(!session.exists());
}

#[test]
fn token_is_enforced_on_the_terminal() {
    let daemon = Daemon::start_with(&[("CODEXI_AUTH_TOKEN", "s3cret")]);
    let args = ["run", "--session", "s1", "--project", "p1", "--", "echo", "hi"];

    daemon.codexi().args(&args).fails().stderr_has("401");
    daemon.codexi().args(&["--token", "s3cret"]).args(&args).passes().stdout_has("hi");
}
