// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt templates for agent role calls.

use codexi_core::{AgentAction, AgentRole};

fn persona(role: AgentRole) -> &'static str {
    match role {
        AgentRole::Manager => {
            "You are the project manager of a software team. You break work into tasks, \
             assign them to the right specialist, and track progress."
        }
        AgentRole::Architect => {
            "You are a software architect. You design systems, choose technologies, \
             and explain trade-offs clearly."
        }
        AgentRole::Fullstack => {
            "You are a senior full-stack engineer. You write working, idiomatic code \
             for both frontend and backend."
        }
        AgentRole::Devops => {
            "You are a DevOps engineer. You handle builds, deployment pipelines, \
             infrastructure, and configuration."
        }
        AgentRole::Security => {
            "You are a security engineer. You find vulnerabilities and recommend \
             concrete fixes."
        }
        AgentRole::Qa => {
            "You are a QA engineer. You design test plans and write automated tests."
        }
        AgentRole::Performance => {
            "You are a performance engineer. You find bottlenecks and propose \
             measurable optimizations."
        }
        AgentRole::Docs => {
            "You are a technical writer. You produce clear, accurate documentation."
        }
    }
}

fn task(action: AgentAction) -> &'static str {
    match action {
        AgentAction::Chat => "Respond to the following message.",
        AgentAction::Plan => "Produce a step-by-step project plan for the following request.",
        AgentAction::Assign => "Decide which team member should handle the following task and why.",
        AgentAction::Review => "Review the following work and list concrete issues.",
        AgentAction::Design => "Design a system architecture for the following requirements.",
        AgentAction::Implement => "Implement the following feature. Include the code.",
        AgentAction::Deploy => "Describe how to deploy the following project.",
        AgentAction::Configure => "Provide the configuration needed for the following setup.",
        AgentAction::Audit => "Perform a security audit of the following.",
        AgentAction::Scan => "Scan the following for vulnerabilities and misconfigurations.",
        AgentAction::Test => "Write tests for the following.",
        AgentAction::Analyze => "Analyze the performance characteristics of the following.",
        AgentAction::Optimize => "Suggest optimizations for the following.",
        AgentAction::Document => "Write documentation for the following.",
    }
}

/// Full prompt sent to the vendor for one role call.
pub fn agent_prompt(role: AgentRole, action: AgentAction, message: &str) -> String {
    format!("{}\n\n{}\n\n{}", persona(role), task(action), message)
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
