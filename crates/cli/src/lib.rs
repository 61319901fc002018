// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! codexi client library: gateway and role dispatch clients, the one-shot
//! terminal client, and the CLI command handlers.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod color;
pub mod commands;
pub mod env;
pub mod exit_error;
pub mod output;

#[cfg(test)]
mod test_helpers;
