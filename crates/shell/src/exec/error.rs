// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution error types.

use std::path::PathBuf;

/// Errors that prevent a command from producing an [`ExecOutput`](super::ExecOutput).
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("command is required")]
    EmptyCommand,

    /// Rejected by the allow-list; nothing was spawned.
    #[error("command not allowed: {command}")]
    NotAllowed { command: String },

    /// Working directory could not be created.
    #[error("failed to prepare working directory {}: {source}", path.display())]
    WorkingDir { path: PathBuf, source: std::io::Error },

    /// Command not found or could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed { command: String, source: std::io::Error },

    /// Waiting on the child failed after it was spawned.
    #[error("failed to wait for `{command}`: {source}")]
    Wait { command: String, source: std::io::Error },

    /// The caller went away; the process group was killed.
    #[error("command `{command}` cancelled")]
    Cancelled { command: String },
}

impl ExecError {
    /// True for errors raised before any process was started because the
    /// request itself is unacceptable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ExecError::EmptyCommand | ExecError::NotAllowed { .. })
    }
}
