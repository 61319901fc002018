// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn every_role_accepts_chat() {
    for role in AgentRole::ALL {
        assert_eq!(role.check_action(AgentAction::Chat), Ok(()), "{role}");
    }
}

#[test]
fn roles_round_trip_through_from_str() {
    for role in AgentRole::ALL {
        assert_eq!(role.as_str().parse::<AgentRole>(), Ok(role));
    }
    for action in AgentAction::ALL {
        assert_eq!(action.as_str().parse::<AgentAction>(), Ok(action));
    }
}

#[yare::parameterized(
    fullstack_implement = { AgentRole::Fullstack, AgentAction::Implement },
    devops_deploy       = { AgentRole::Devops, AgentAction::Deploy },
    manager_plan        = { AgentRole::Manager, AgentAction::Plan },
    docs_document       = { AgentRole::Docs, AgentAction::Document },
)]
fn role_accepts_its_actions(role: AgentRole, action: AgentAction) {
    assert!(role.check_action(action).is_ok());
}

#[test]
fn role_rejects_foreign_action() {
    let err = AgentRole::Docs.check_action(AgentAction::Deploy).unwrap_err();
    assert_eq!(err.to_string(), "Action deploy is not supported by the docs agent");
}

#[test]
fn unknown_role_is_rejected() {
    let err = "ceo".parse::<AgentRole>().unwrap_err();
    assert_eq!(err, RoleError::UnknownRole("ceo".to_string()));
}

#[test]
fn endpoint_is_per_role() {
    assert_eq!(AgentRole::Qa.endpoint(), "/functions/v1/agents/qa");
}

#[test]
fn role_serde_uses_lowercase() {
    assert_eq!(serde_json::to_string(&AgentRole::Devops).unwrap(), "\"devops\"");
    let action: AgentAction = serde_json::from_str("\"implement\"").unwrap();
    assert_eq!(action, AgentAction::Implement);
}
