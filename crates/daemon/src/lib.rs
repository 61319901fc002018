// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! codexi daemon library
//!
//! Terminal listener, vendor gateway, session registry, and lifecycle
//! management for the `codexid` binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod auth;
pub mod env;
pub mod gateway;
pub mod lifecycle;
pub mod logging;
pub mod session;
pub mod terminal;

#[cfg(test)]
mod test_helpers;
