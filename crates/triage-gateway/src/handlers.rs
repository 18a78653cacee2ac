// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use triage_core::{HealthStatus, TriageError};

use crate::server::AppState;

/// Request body for POST /classify.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub demo: &'static str,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy".
    pub status: &'static str,
    pub version: &'static str,
    pub ai_model_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /
pub async fn get_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "triage",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        demo: "/static/index.html",
    })
}

/// GET /health
///
/// Degraded still answers 200: classification keeps working on rules.
pub async fn get_health(State(state): State<AppState>) -> Response {
    let ai_model_available = state.orchestrator.ai_available();
    let (code, status, detail) = match state.orchestrator.health() {
        HealthStatus::Healthy => (StatusCode::OK, "healthy", None),
        HealthStatus::Degraded(why) => (StatusCode::OK, "degraded", Some(why)),
        HealthStatus::Unhealthy(why) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(why)),
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            ai_model_available,
            detail,
        }),
    )
        .into_response()
}

/// POST /classify
pub async fn post_classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Response {
    match state.orchestrator.classify(&body.text).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(TriageError::EmptyInput) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            TriageError::EmptyInput.to_string(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "classification failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "classification failed")
        }
    }
}

/// GET /metrics
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match &state.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, "metrics are not enabled"),
    }
}

fn error_response(code: StatusCode, error: impl Into<String>) -> Response {
    (
        code,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}
