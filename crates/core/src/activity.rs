// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only activity log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AgentAction, AgentRole, ProjectId, Provider, SessionId};

/// Logged output fields are cut to this many characters.
pub const ACTIVITY_TRUNCATE_CHARS: usize = 1000;

/// Agent id recorded for terminal commands.
pub const TERMINAL_AGENT_ID: &str = "terminal";

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// One row of the `agent_activities` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub agent_id: String,
    pub project_id: ProjectId,
    pub activity_type: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one terminal command execution attempt.
#[derive(Debug, Clone)]
pub struct TerminalActivity<'a> {
    pub project_id: &'a ProjectId,
    pub session_id: &'a SessionId,
    pub command: &'a str,
    pub exit_code: i32,
    pub success: bool,
    pub stdout: &'a str,
    pub stderr: &'a str,
}

/// One agent role call through the gateway.
#[derive(Debug, Clone)]
pub struct AgentActivity<'a> {
    pub project_id: &'a ProjectId,
    pub role: AgentRole,
    pub action: AgentAction,
    pub provider: Provider,
    pub message: &'a str,
    pub response: &'a str,
}

impl ActivityLogEntry {
    pub fn terminal_command(activity: TerminalActivity<'_>, timestamp: DateTime<Utc>) -> Self {
        Self {
            agent_id: TERMINAL_AGENT_ID.to_string(),
            project_id: activity.project_id.clone(),
            activity_type: "terminal_command".to_string(),
            details: json!({
                "command": activity.command,
                "exit_code": activity.exit_code,
                "success": activity.success,
                "stdout": truncate_chars(activity.stdout, ACTIVITY_TRUNCATE_CHARS),
                "stderr": truncate_chars(activity.stderr, ACTIVITY_TRUNCATE_CHARS),
                "session_id": activity.session_id,
            }),
            timestamp,
        }
    }

    pub fn agent_call(activity: AgentActivity<'_>, timestamp: DateTime<Utc>) -> Self {
        Self {
            agent_id: activity.role.as_str().to_string(),
            project_id: activity.project_id.clone(),
            activity_type: format!("agent_{}", activity.action),
            details: json!({
                "provider": activity.provider,
                "message": truncate_chars(activity.message, ACTIVITY_TRUNCATE_CHARS),
                "response": truncate_chars(activity.response, ACTIVITY_TRUNCATE_CHARS),
            }),
            timestamp,
        }
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
