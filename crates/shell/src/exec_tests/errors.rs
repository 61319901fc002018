// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for rejection and spawn failures.

use tokio_util::sync::CancellationToken;

use super::{executor, spec_in};
use crate::exec::{CommandExecutor, ExecError};
use crate::ExecPolicy;

#[tokio::test]
async fn spawn_failed_command_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = executor()
        .run(&spec_in(dir.path(), "nonexistent_command_xyz_12345", &[]), &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        ExecError::SpawnFailed { command, source } => {
            assert_eq!(command, "nonexistent_command_xyz_12345");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected SpawnFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn disallowed_command_is_rejected_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().join("never-created");
    let exec = CommandExecutor::new(ExecPolicy::default());
    let err = exec
        .run(&spec_in(&cwd, "curl", &["https://example.com"]), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "command not allowed: curl");
    assert!(!cwd.exists());
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = executor()
        .run(&spec_in(dir.path(), "", &[]), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::EmptyCommand));
}

#[cfg(unix)]
#[tokio::test]
async fn unwritable_cwd_is_reported() {
    let err = executor()
        .run(&spec_in(std::path::Path::new("/proc/codexi-nope"), "true", &[]), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::WorkingDir { .. }), "{err:?}");
}
