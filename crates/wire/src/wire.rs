// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON text-frame encoding.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors from frame encoding and decoding
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary frames are not supported")]
    BinaryFrame,

    #[error("connection closed")]
    ConnectionClosed,
}

/// Encode a message as a JSON text frame.
pub fn encode<T: Serialize>(msg: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a JSON text frame.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
