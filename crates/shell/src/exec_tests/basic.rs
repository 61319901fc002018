// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for output capture, exit codes, and the child environment.

use tokio_util::sync::CancellationToken;

use super::{executor, run_async, spec_in};

#[tokio::test]
async fn echo_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "echo", &["hello"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.stdout, "hello\n");
    assert_eq!(out.stderr, "");
    assert_eq!(out.exit_code, 0);
    assert!(out.success());
    assert!(!out.timed_out);
    assert!(!out.truncated);
}

#[yare::parameterized(
    true_cmd  = { "true", &[], 0 },
    false_cmd = { "false", &[], 1 },
    exit_7    = { "sh", &["-c", "exit 7"], 7 },
)]
fn exit_code(program: &str, args: &[&str], expected: i32) {
    run_async(async {
        let dir = tempfile::tempdir().unwrap();
        let out = executor()
            .run(&spec_in(dir.path(), program, args), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.exit_code, expected);
        assert_eq!(out.success(), expected == 0);
    });
}

#[tokio::test]
async fn stderr_is_captured_separately() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "sh", &["-c", "echo out; echo err >&2"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.stdout, "out\n");
    assert_eq!(out.stderr, "err\n");
}

#[tokio::test]
async fn arguments_are_not_shell_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "echo", &["$HOME", "*", "a;b"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.stdout, "$HOME * a;b\n");
}

#[tokio::test]
async fn environment_is_restricted() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "env", &[]), &CancellationToken::new())
        .await
        .unwrap();
    let mut vars: Vec<&str> = out.stdout.lines().collect();
    vars.sort_unstable();
    let home = format!("HOME={}", dir.path().display());
    assert_eq!(vars, vec![home.as_str(), "PATH=/usr/local/bin:/usr/bin:/bin", "USER=codexi"]);
}

#[tokio::test]
async fn missing_cwd_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c");
    let out = executor()
        .run(&spec_in(&nested, "pwd", &[]), &CancellationToken::new())
        .await
        .unwrap();
    assert!(nested.is_dir());
    let canonical = nested.canonicalize().unwrap();
    assert_eq!(out.stdout.trim_end(), canonical.display().to_string());
}

#[cfg(unix)]
#[tokio::test]
async fn signal_exit_reports_minus_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "sh", &["-c", "kill -9 $$"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.exit_code, -1);
    assert!(!out.success());
}

#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() {
    let dir = tempfile::tempdir().unwrap();
    let out = executor()
        .run(&spec_in(dir.path(), "printf", &["a\\377b"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.stdout, "a\u{FFFD}b");
}
