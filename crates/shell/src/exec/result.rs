// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured execution output.

use std::time::Duration;

/// Exit code reported when the wall-clock limit kills a command.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Process exit code; `-1` when terminated by a signal.
    pub exit_code: i32,
    /// Captured stdout, lossily decoded as UTF-8.
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// Either stream hit the output cap.
    pub truncated: bool,
    pub duration: Duration,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}
