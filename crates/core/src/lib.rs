// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! codexi-core: Shared types for the Code-XI agent dashboard backend

pub mod activity;
pub mod clock;
pub mod id;
pub mod provider;
pub mod role;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use activity::{
    truncate_chars, ActivityLogEntry, AgentActivity, TerminalActivity, ACTIVITY_TRUNCATE_CHARS,
    TERMINAL_AGENT_ID,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, ProjectId, RequestId};
pub use provider::{Provider, UnsupportedProvider};
pub use role::{AgentAction, AgentRole, RoleError};
pub use session::{SessionId, SessionIdError, SESSION_DIR_PREFIX};
