// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external collaborators: LLM vendor APIs and user
//! notifications.

pub mod gateway;
pub mod notify;
pub mod prompt;
pub mod transport;
pub mod vendor;

pub use gateway::{AgentReply, Gateway, GatewayError};
pub use notify::{NotifyAdapter, NotifyError, StderrNotifyAdapter};
pub use prompt::agent_prompt;
pub use transport::{
    HttpTransport, Method, ReqwestTransport, TransportError, VendorRequest, VendorResponse,
};
pub use vendor::{ExtractError, VendorAdapter, VendorRegistry};

#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use transport::FakeTransport;
