// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the command executor.

use super::*;
use crate::AllowList;

mod basic;
mod errors;
mod limits;

/// Executor that may run anything, with short limits.
pub(crate) fn executor() -> CommandExecutor {
    CommandExecutor::new(open_policy())
}

pub(crate) fn open_policy() -> ExecPolicy {
    ExecPolicy {
        drain_grace: std::time::Duration::from_millis(200),
        ..ExecPolicy::default().with_allow(AllowList::Any)
    }
}

pub(crate) fn spec_in(dir: &std::path::Path, program: &str, args: &[&str]) -> CommandSpec {
    CommandSpec::new(program, args.iter().map(|a| a.to_string()).collect(), dir)
}

pub(crate) fn run_async<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(f)
}
