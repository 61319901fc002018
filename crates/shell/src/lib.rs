// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! codexi-shell: run a single command as a child process under an
//! execution policy.
//!
//! The executor never goes through a shell: the command name and argument
//! list are passed to the OS verbatim. The policy decides which command
//! names may run, how long they may run, and how much output is kept.

pub mod exec;
pub mod policy;

pub use exec::{CommandExecutor, CommandSpec, ExecError, ExecOutput, TIMEOUT_EXIT_CODE};
pub use policy::{AllowList, ExecPolicy, DEFAULT_PATH, DEFAULT_USER};
