// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware and shared state.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use triage_core::TriageError;
use triage_engine::Orchestrator;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Renders Prometheus text for /metrics; `None` disables the route.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            prometheus_render: None,
        }
    }

    pub fn with_metrics(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }
}

/// Listener and static-file settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Served under /static when set.
    pub static_dir: Option<PathBuf>,
}

/// Build the application router.
///
/// - GET / : service info
/// - GET /health : health and AI availability
/// - POST /classify : classify one message
/// - GET /metrics : Prometheus text
/// - /static/* : files from `static_dir`
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/", get(crate::handlers::get_root))
        .route("/health", get(crate::handlers::get_health))
        .route("/classify", post(crate::handlers::post_classify))
        .route("/metrics", get(crate::handlers::get_metrics))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TriageError> {
    let app = build_router(state, config.static_dir.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TriageError::Http {
            message: format!("failed to bind to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    let local: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!(addr = ?local, "triage listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TriageError::Http {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: None,
        };
        assert!(format!("{config:?}").contains("127.0.0.1"));
    }
}
