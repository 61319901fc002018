// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP vendor gateway and agent endpoints.

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use codexi_adapters::{Gateway, HttpTransport};
use codexi_storage::ActivityLog;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state for gateway handlers.
pub struct GatewayState<T: HttpTransport> {
    pub gateway: Gateway<T>,
    pub activity: ActivityLog,
    /// When set, every `/functions` route requires this bearer token.
    pub auth_token: Option<String>,
}

pub fn router<T: HttpTransport>(state: Arc<GatewayState<T>>) -> Router {
    let functions = Router::new()
        .route("/list-models", post(handlers::list_models::<T>))
        .route("/chat", post(handlers::chat::<T>))
        .route("/agents/:role", post(handlers::agent::<T>))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            handlers::require_token::<T>,
        ));

    Router::new()
        .nest("/functions/v1", functions)
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` fires.
pub async fn serve<T: HttpTransport>(
    listener: TcpListener,
    state: Arc<GatewayState<T>>,
    shutdown: CancellationToken,
) {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "gateway listener ready");
    }
    let app = router(state);
    if let Err(e) =
        axum::serve(listener, app).with_graceful_shutdown(shutdown.cancelled_owned()).await
    {
        error!("gateway server error: {}", e);
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
