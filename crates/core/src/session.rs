// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier type for terminal sessions.
//!
//! A SessionId is chosen by the client and scopes a working directory on the
//! executing host. Because it becomes part of a filesystem path, only a
//! restricted alphabet is accepted.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Maximum accepted session id length.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Prefix of every session directory name.
pub const SESSION_DIR_PREFIX: &str = "codexi-session-";

/// Errors from session id validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    #[error("session id is required")]
    Empty,
    #[error("session id exceeds {MAX_SESSION_ID_LEN} characters")]
    TooLong,
    #[error("session id may only contain letters, digits, '-' and '_'")]
    InvalidChar,
}

/// Unique identifier for a terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new SessionId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this SessionId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the id is safe to embed in a directory name.
    pub fn validate(&self) -> Result<(), SessionIdError> {
        if self.0.is_empty() {
            return Err(SessionIdError::Empty);
        }
        if self.0.len() > MAX_SESSION_ID_LEN {
            return Err(SessionIdError::TooLong);
        }
        if !self.0.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(SessionIdError::InvalidChar);
        }
        Ok(())
    }

    /// Directory name for this session under the session root.
    pub fn dir_name(&self) -> String {
        format!("{SESSION_DIR_PREFIX}{}", self.0)
    }

    /// Inverse of [`dir_name`](Self::dir_name). `None` for any other name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let id = Self::new(name.strip_prefix(SESSION_DIR_PREFIX)?);
        id.validate().ok()?;
        Some(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for SessionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
