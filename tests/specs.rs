// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specs driving the built `codexi` and `codexid` binaries.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/mod.rs"]
mod specs;

pub use specs::prelude;
