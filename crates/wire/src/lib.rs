// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the terminal Command Channel and the HTTP gateway.
//!
//! Command Channel wire format: one JSON object per WebSocket text frame.
//! Gateway wire format: JSON request/response bodies.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod command;
mod gateway;
mod wire;

pub use command::{
    ClientMessage, CommandRequest, CommandResult, ControlMessage, ServerMessage,
    GENERIC_PARSE_ERROR,
};
pub use gateway::{
    AgentRequest, AgentResponse, ChatResponse, ErrorBody, GatewayRequest, ModelsResponse,
};
pub use wire::{decode, encode, ProtocolError};
