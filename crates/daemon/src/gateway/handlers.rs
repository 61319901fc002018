// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use codexi_adapters::HttpTransport;
use codexi_core::{ActivityLogEntry, AgentActivity, Clock, ProjectId, SystemClock};
use codexi_wire::{AgentRequest, AgentResponse, ChatResponse, GatewayRequest, ModelsResponse};
use serde_json::{json, Value};
use tracing::debug;

use super::{ApiError, GatewayState};
use crate::auth;

/// Project recorded for agent calls that do not name one.
const DEFAULT_PROJECT: &str = "default";

type Shared<T> = State<Arc<GatewayState<T>>>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|e| ApiError::BadRequest(e.body_text()))
}

pub(super) async fn list_models<T: HttpTransport>(
    State(state): Shared<T>,
    payload: Result<Json<GatewayRequest>, JsonRejection>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let req = body(payload)?;
    debug!(provider = %req.provider, "list-models");
    let models = state.gateway.list_models(&req).await?;
    Ok(Json(ModelsResponse { models }))
}

pub(super) async fn chat<T: HttpTransport>(
    State(state): Shared<T>,
    payload: Result<Json<GatewayRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let req = body(payload)?;
    debug!(provider = %req.provider, "chat");
    let response = state.gateway.chat(&req).await?;
    Ok(Json(ChatResponse { response }))
}

pub(super) async fn agent<T: HttpTransport>(
    State(state): Shared<T>,
    Path(role): Path<String>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let req = body(payload)?;
    debug!(%role, action = %req.action, provider = %req.provider, "agent call");
    let reply = state.gateway.agent(&role, &req).await?;

    let project_id = req.project_id.clone().unwrap_or_else(|| ProjectId::from(DEFAULT_PROJECT));
    let entry = ActivityLogEntry::agent_call(
        AgentActivity {
            project_id: &project_id,
            role: reply.role,
            action: reply.action,
            provider: reply.provider,
            message: &req.message,
            response: &reply.response,
        },
        SystemClock.now_utc(),
    );
    state.activity.record_async(entry).await;

    Ok(Json(AgentResponse { agent: reply.role, action: reply.action, response: reply.response }))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::env::VERSION }))
}

pub(super) async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub(super) async fn require_token<T: HttpTransport>(
    State(state): Shared<T>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth::authorized(state.auth_token.as_deref(), header, req.uri().query()) {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Unauthorized)
    }
}
