// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent personas and the actions each one accepts.
//!
//! A role is a label: it selects an endpoint and a prompt template, and
//! carries no state of its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation errors for role dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("Unsupported agent role: {0}")]
    UnknownRole(String),
    #[error("Unsupported action: {0}")]
    UnknownAction(String),
    #[error("Action {action} is not supported by the {role} agent")]
    ActionNotAllowed { role: AgentRole, action: AgentAction },
}

/// Named agent personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Manager,
    Architect,
    Fullstack,
    Devops,
    Security,
    Qa,
    Performance,
    Docs,
}

/// The `action` tag a role call carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAction {
    Chat,
    Plan,
    Assign,
    Review,
    Design,
    Implement,
    Deploy,
    Configure,
    Audit,
    Scan,
    Test,
    Analyze,
    Optimize,
    Document,
}

impl AgentRole {
    pub const ALL: [AgentRole; 8] = [
        AgentRole::Manager,
        AgentRole::Architect,
        AgentRole::Fullstack,
        AgentRole::Devops,
        AgentRole::Security,
        AgentRole::Qa,
        AgentRole::Performance,
        AgentRole::Docs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Manager => "manager",
            AgentRole::Architect => "architect",
            AgentRole::Fullstack => "fullstack",
            AgentRole::Devops => "devops",
            AgentRole::Security => "security",
            AgentRole::Qa => "qa",
            AgentRole::Performance => "performance",
            AgentRole::Docs => "docs",
        }
    }

    /// Human-readable persona name used in prompts and output.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Manager => "Project Manager",
            AgentRole::Architect => "Solutions Architect",
            AgentRole::Fullstack => "Full-Stack Engineer",
            AgentRole::Devops => "DevOps Engineer",
            AgentRole::Security => "Security Engineer",
            AgentRole::Qa => "QA Engineer",
            AgentRole::Performance => "Performance Engineer",
            AgentRole::Docs => "Documentation Writer",
        }
    }

    /// Actions this role accepts. Every role accepts `chat`.
    pub fn actions(&self) -> &'static [AgentAction] {
        use AgentAction::*;
        match self {
            AgentRole::Manager => &[Chat, Plan, Assign, Review],
            AgentRole::Architect => &[Chat, Design, Review],
            AgentRole::Fullstack => &[Chat, Implement, Review],
            AgentRole::Devops => &[Chat, Deploy, Configure],
            AgentRole::Security => &[Chat, Audit, Scan],
            AgentRole::Qa => &[Chat, Test, Review],
            AgentRole::Performance => &[Chat, Analyze, Optimize],
            AgentRole::Docs => &[Chat, Document, Review],
        }
    }

    /// Endpoint path relative to the gateway base URL.
    pub fn endpoint(&self) -> String {
        format!("/functions/v1/agents/{}", self.as_str())
    }

    /// Check that `action` is one this role accepts.
    pub fn check_action(&self, action: AgentAction) -> Result<(), RoleError> {
        if self.actions().contains(&action) {
            Ok(())
        } else {
            Err(RoleError::ActionNotAllowed { role: *self, action })
        }
    }
}

impl AgentAction {
    pub const ALL: [AgentAction; 14] = [
        AgentAction::Chat,
        AgentAction::Plan,
        AgentAction::Assign,
        AgentAction::Review,
        AgentAction::Design,
        AgentAction::Implement,
        AgentAction::Deploy,
        AgentAction::Configure,
        AgentAction::Audit,
        AgentAction::Scan,
        AgentAction::Test,
        AgentAction::Analyze,
        AgentAction::Optimize,
        AgentAction::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::Chat => "chat",
            AgentAction::Plan => "plan",
            AgentAction::Assign => "assign",
            AgentAction::Review => "review",
            AgentAction::Design => "design",
            AgentAction::Implement => "implement",
            AgentAction::Deploy => "deploy",
            AgentAction::Configure => "configure",
            AgentAction::Audit => "audit",
            AgentAction::Scan => "scan",
            AgentAction::Test => "test",
            AgentAction::Analyze => "analyze",
            AgentAction::Optimize => "optimize",
            AgentAction::Document => "document",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RoleError::UnknownRole(s.to_string()))
    }
}

impl FromStr for AgentAction {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RoleError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
