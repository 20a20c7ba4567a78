use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::dispatch::{Dispatcher, ResolverEvent, error_shape};
use crate::health::{HealthDispatcher, HealthStatus};

/// Shared handles for the HTTP routes.
#[derive(Clone)]
pub struct AppState {
    ai: Arc<Dispatcher>,
    resolver: Arc<HealthDispatcher>,
}

impl AppState {
    pub fn new(ai: Dispatcher, resolver: HealthDispatcher) -> Self {
        Self {
            ai: Arc::new(ai),
            resolver: Arc::new(resolver),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ai-proxy", post(ai_proxy))
        .route("/v1/resolver", post(resolver))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "resolver proxy listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

type Reply = (StatusCode, Json<Value>);

/// Undecodable events still answer with the `{error}` shape.
fn rejected(rejection: JsonRejection) -> Reply {
    warn!(error = %rejection.body_text(), "rejected resolver event");
    (
        rejection.status(),
        Json(error_shape(format!("Invalid event: {}", rejection.body_text()))),
    )
}

// Dispatch blocks on the remote call, so it runs on the blocking pool.
async fn ai_proxy(
    State(state): State<AppState>,
    event: Result<Json<ResolverEvent>, JsonRejection>,
) -> Reply {
    let Json(event) = match event {
        Ok(event) => event,
        Err(rejection) => return rejected(rejection),
    };
    let dispatcher = Arc::clone(&state.ai);
    match tokio::task::spawn_blocking(move || dispatcher.handle(&event)).await {
        Ok(output) => (StatusCode::OK, Json(output)),
        Err(err) => {
            error!(error = %err, "dispatch task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_shape(format!("dispatch task failed: {err}"))),
            )
        }
    }
}

async fn resolver(
    State(state): State<AppState>,
    event: Result<Json<ResolverEvent>, JsonRejection>,
) -> Reply {
    match event {
        Ok(Json(event)) => (StatusCode::OK, Json(state.resolver.handle(&event))),
        Err(rejection) => rejected(rejection),
    }
}

async fn healthz(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.resolver.reporter().report())
}
