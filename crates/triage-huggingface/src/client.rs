// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Hugging Face Inference API.
//!
//! Provides [`HuggingFaceClient`], which builds authenticated requests,
//! maps every failure to an [`AiFailureKind`] and optionally retries
//! transient statuses (429, 500, 503).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use triage_core::{AiFailureKind, TriageError};

use crate::types::{ApiErrorBody, InferenceRequest, InferenceResponse, SentimentScore};

/// Outer bound on any single HTTP exchange. The orchestrator's AI budget
/// is normally much shorter and cancels the request first.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between retry attempts.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// HTTP client for a single hosted text-classification model.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl HuggingFaceClient {
    /// Create a client for `{base_url}/{model}` authenticated with `token`.
    pub fn new(
        token: &SecretString,
        base_url: &str,
        model: &str,
        max_retries: u32,
    ) -> Result<Self, TriageError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| TriageError::AiUnavailable {
                kind: AiFailureKind::Credentials,
                message: "API token is not a valid header value".to_string(),
                source: Some(Box::new(e)),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| TriageError::AiUnavailable {
                kind: AiFailureKind::NotConfigured,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            max_retries,
        })
    }

    /// The full model URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run sentiment classification and return the top scoring label.
    pub async fn classify(&self, text: &str) -> Result<SentimentScore, TriageError> {
        let request = InferenceRequest::new(text);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                warn!(attempt, "retrying inference request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            debug!(status = %status, attempt, "inference response received");

            if status.is_success() {
                let body = response.text().await.map_err(transport_error)?;
                return parse_body(&body);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                attempt += 1;
                continue;
            }
            return Err(status_error(status, &body));
        }
    }
}

fn parse_body(body: &str) -> Result<SentimentScore, TriageError> {
    let parsed: InferenceResponse =
        serde_json::from_str(body).map_err(|e| TriageError::AiUnavailable {
            kind: AiFailureKind::MalformedResponse,
            message: format!("failed to parse inference response: {e}"),
            source: Some(Box::new(e)),
        })?;

    let top = parsed.top().cloned().ok_or_else(|| {
        TriageError::ai(
            AiFailureKind::MalformedResponse,
            "inference response contained no scores",
        )
    })?;

    if !(0.0..=1.0).contains(&top.score) {
        return Err(TriageError::ai(
            AiFailureKind::MalformedResponse,
            format!("score {} for label {} is outside [0, 1]", top.score, top.label),
        ));
    }
    Ok(top)
}

fn transport_error(e: reqwest::Error) -> TriageError {
    let kind = if e.is_timeout() {
        AiFailureKind::Timeout
    } else {
        AiFailureKind::Network
    };
    TriageError::AiUnavailable {
        kind,
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn status_error(status: StatusCode, body: &str) -> TriageError {
    let kind = match status.as_u16() {
        401 | 403 => AiFailureKind::Credentials,
        429 => AiFailureKind::RateLimited,
        503 => AiFailureKind::ModelLoading,
        _ => AiFailureKind::ProviderError,
    };
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    TriageError::ai(kind, format!("inference API returned {status}: {detail}"))
}

/// Statuses worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
