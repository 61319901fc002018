// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-command executor.

mod capture;
mod error;
mod result;
mod run;

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::ExecPolicy;

pub use error::ExecError;
pub use result::{ExecOutput, TIMEOUT_EXIT_CODE};

/// What to run and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; created if missing.
    pub cwd: PathBuf,
    /// Value of `HOME` for the child.
    pub home: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        Self { program: program.into(), args, home: cwd.clone(), cwd }
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }
}

/// Runs commands under a shared [`ExecPolicy`].
///
/// Cheap to clone; all clones share the same policy.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    policy: Arc<ExecPolicy>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(ExecPolicy::default())
    }
}

impl CommandExecutor {
    pub fn new(policy: ExecPolicy) -> Self {
        Self { policy: Arc::new(policy) }
    }

    pub fn policy(&self) -> &ExecPolicy {
        &self.policy
    }

    /// Run one command to completion, timeout, or cancellation.
    ///
    /// A non-zero exit is not an error; it is reported in [`ExecOutput`].
    pub async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<ExecOutput, ExecError> {
        self.policy.check(&spec.program)?;
        run::run_command(&self.policy, spec, cancel).await
    }
}

#[cfg(test)]
#[path = "../exec_tests/mod.rs"]
mod tests;
