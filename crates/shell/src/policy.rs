// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution policy: which commands may run and with what limits.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::ExecError;

/// `PATH` given to every child process.
pub const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// `USER` given to every child process.
pub const DEFAULT_USER: &str = "codexi";

/// Commands permitted when no allow-list is configured.
const DEFAULT_ALLOWED: &[&str] = &[
    "cargo", "cat", "cp", "date", "echo", "env", "false", "find", "git", "go", "grep", "head",
    "ls", "make", "mkdir", "mv", "node", "npm", "npx", "pwd", "python3", "rm", "sleep", "tail",
    "touch", "true", "wc", "which", "whoami",
];

/// Set of command names the executor will spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    /// No restriction. Only for trusted single-operator deployments.
    Any,
    /// Exact command names.
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Parse a list of names; a lone `*` means [`AllowList::Any`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name == "*" {
                return AllowList::Any;
            }
            if !name.is_empty() {
                set.insert(name.to_string());
            }
        }
        AllowList::Only(set)
    }

    pub fn permits(&self, command: &str) -> bool {
        match self {
            AllowList::Any => true,
            AllowList::Only(names) => names.contains(command),
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        AllowList::from_names(DEFAULT_ALLOWED)
    }
}

/// Limits applied to every command.
#[derive(Debug, Clone)]
pub struct ExecPolicy {
    pub allow: AllowList,
    /// Hard wall-clock limit; the process is killed when it elapses.
    pub timeout: Duration,
    /// Bytes kept per output stream; the remainder is drained and dropped.
    pub output_cap: usize,
    /// Grace period for output pipes to close after the process exits.
    pub drain_grace: Duration,
    pub path: String,
    pub user: String,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        Self {
            allow: AllowList::default(),
            timeout: Duration::from_secs(30),
            output_cap: 1024 * 1024,
            drain_grace: Duration::from_secs(2),
            path: DEFAULT_PATH.to_string(),
            user: DEFAULT_USER.to_string(),
        }
    }
}

impl ExecPolicy {
    pub fn with_allow(mut self, allow: AllowList) -> Self {
        self.allow = allow;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_cap(mut self, bytes: usize) -> Self {
        self.output_cap = bytes;
        self
    }

    /// Reject commands outside the allow-list before anything is spawned.
    pub fn check(&self, command: &str) -> Result<(), ExecError> {
        if command.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        if !self.allow.permits(command) {
            return Err(ExecError::NotAllowed { command: command.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
