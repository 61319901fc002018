// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for timeouts, output caps, and cancellation.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::{open_policy, spec_in};
use crate::exec::{CommandExecutor, ExecError, TIMEOUT_EXIT_CODE};

#[tokio::test]
async fn timeout_kills_and_reports_124() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy().with_timeout(Duration::from_millis(200)));
    let start = Instant::now();
    let out = exec
        .run(&spec_in(dir.path(), "sleep", &["10"]), &CancellationToken::new())
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(out.exit_code, TIMEOUT_EXIT_CODE);
    assert!(out.timed_out);
    assert!(!out.success());
    assert!(out.stderr.contains("timed out after 200ms"), "{}", out.stderr);
}

#[tokio::test]
async fn timeout_keeps_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy().with_timeout(Duration::from_millis(300)));
    let out = exec
        .run(&spec_in(dir.path(), "sh", &["-c", "echo early; sleep 10"]), &CancellationToken::new())
        .await
        .unwrap();
    assert!(out.timed_out);
    assert_eq!(out.stdout, "early\n");
}

#[tokio::test]
async fn output_beyond_cap_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy().with_output_cap(100));
    let out = exec
        .run(&spec_in(dir.path(), "sh", &["-c", "yes x | head -c 100000"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.exit_code, 0);
    assert_eq!(out.stdout.len(), 100);
    assert!(out.truncated);
}

#[tokio::test]
async fn output_at_cap_is_not_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy().with_output_cap(6));
    let out = exec
        .run(&spec_in(dir.path(), "echo", &["hello"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.stdout, "hello\n");
    assert!(!out.truncated);
}

#[tokio::test]
async fn cancellation_kills_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });
    let start = Instant::now();
    let err = exec.run(&spec_in(dir.path(), "sleep", &["10"]), &cancel).await.unwrap_err();
    assert!(matches!(err, ExecError::Cancelled { .. }), "{err:?}");
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn background_grandchild_does_not_block_result() {
    let dir = tempfile::tempdir().unwrap();
    let exec = CommandExecutor::new(open_policy());
    let start = Instant::now();
    let out = exec
        .run(&spec_in(dir.path(), "sh", &["-c", "sleep 10 & echo done"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.exit_code, 0);
    assert_eq!(out.stdout, "done\n");
    assert!(start.elapsed() < Duration::from_secs(5));
}
