// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hugging Face Inference API strategy for the Triage classifier.
//!
//! Implements [`ClassificationStrategy`] on top of a hosted sentiment model.
//! Every failure surfaces as [`TriageError::AiUnavailable`] so the
//! orchestrator can fall back to rules.

pub mod client;
pub mod mapping;
pub mod types;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{info, warn};
use triage_config::HuggingFaceConfig;
use triage_core::{
    AiFailureKind, ClassificationInput, ClassificationStrategy, Method, TriageError, Verdict,
};

use crate::client::HuggingFaceClient;
use crate::mapping::map_sentiment;

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "HF_API_TOKEN";

/// AI classification strategy backed by the Hugging Face Inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceClassifier {
    client: HuggingFaceClient,
    model: String,
    max_input_chars: usize,
}

impl HuggingFaceClassifier {
    /// Build the strategy from configuration.
    ///
    /// # Token Resolution
    /// 1. `huggingface.api_token` if set and non-empty
    /// 2. `HF_API_TOKEN` environment variable
    ///
    /// Returns `Ok(None)` when neither is present or the token is unusable:
    /// the service then runs on rules alone.
    pub fn from_config(config: &HuggingFaceConfig) -> Result<Option<Self>, TriageError> {
        let Some(token) = resolve_token(config.api_token.as_deref()) else {
            info!("no Hugging Face token configured, AI classification disabled");
            return Ok(None);
        };
        match Self::with_token(&token, config) {
            Ok(classifier) => {
                info!(model = %config.model, "Hugging Face classifier initialized");
                Ok(Some(classifier))
            }
            Err(e) if e.is_ai_failure() => {
                warn!(
                    kind = %e.ai_failure_kind().unwrap_or(AiFailureKind::NotConfigured),
                    error = %e,
                    "Hugging Face classifier unavailable, AI classification disabled"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Build the strategy with an explicit token.
    pub fn with_token(token: &SecretString, config: &HuggingFaceConfig) -> Result<Self, TriageError> {
        let client = HuggingFaceClient::new(
            token,
            &config.base_url,
            &config.model,
            config.max_retries,
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
        })
    }

    /// Model identifier requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ClassificationStrategy for HuggingFaceClassifier {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn method(&self) -> Method {
        Method::Ai
    }

    async fn classify(&self, input: &ClassificationInput) -> Result<Verdict, TriageError> {
        let text = truncate_chars(input.text(), self.max_input_chars);
        let sentiment = self.client.classify(text).await?;
        map_sentiment(input.text(), &sentiment)
    }
}

/// Config token first, then the environment.
pub fn resolve_token(config_token: Option<&str>) -> Option<SecretString> {
    pick_token(config_token, std::env::var(TOKEN_ENV_VAR).ok())
}

fn pick_token(config_token: Option<&str>, env_token: Option<String>) -> Option<SecretString> {
    config_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| env_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
        .map(SecretString::from)
}

/// The first `max` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use triage_core::IntentLabel;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> HuggingFaceConfig {
        HuggingFaceConfig {
            base_url: base_url.to_string(),
            model: "acme/sentiment".to_string(),
            max_input_chars: 5,
            ..HuggingFaceConfig::default()
        }
    }

    fn token() -> SecretString {
        SecretString::from("hf_test".to_string())
    }

    #[test]
    fn config_token_beats_env_token() {
        let t = pick_token(Some("hf_config"), Some("hf_env".into())).unwrap();
        assert_eq!(t.expose_secret(), "hf_config");
    }

    #[test]
    fn blank_config_token_falls_back_to_env() {
        let t = pick_token(Some("  "), Some("hf_env".into())).unwrap();
        assert_eq!(t.expose_secret(), "hf_env");
        assert!(pick_token(None, Some(String::new())).is_none());
        assert!(pick_token(None, None).is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 50), "short");
    }

    #[test]
    fn unusable_token_disables_ai_without_failing() {
        let mut cfg = config("http://127.0.0.1:1");
        cfg.api_token = Some("hf_t\u{f6}k\u{7f}en".to_string());
        assert!(HuggingFaceClassifier::from_config(&cfg).unwrap().is_none());

        let err = HuggingFaceClassifier::with_token(&SecretString::from("bad\ntoken".to_string()), &cfg)
            .unwrap_err();
        assert_eq!(err.ai_failure_kind(), Some(AiFailureKind::Credentials));
    }

    #[test]
    fn explicit_token_builds_available_strategy() {
        let strategy = HuggingFaceClassifier::with_token(&token(), &config("http://localhost")).unwrap();
        assert!(strategy.is_available());
        assert_eq!(strategy.method(), Method::Ai);
        assert_eq!(strategy.model(), "acme/sentiment");
    }

    #[tokio::test]
    async fn classify_truncates_and_maps() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"inputs": "Terri"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!([[{"label": "NEGATIVE", "score": 0.98}]]),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = HuggingFaceClassifier::with_token(&token(), &config(&server.uri())).unwrap();
        let input = ClassificationInput::new("Terrible support experience").unwrap();
        let verdict = strategy.classify(&input).await.unwrap();
        assert_eq!(verdict.label(), IntentLabel::Complaint);
        assert_eq!(verdict.method(), Method::Ai);
        assert!((verdict.confidence() - 95.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_before_question_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let strategy = HuggingFaceClassifier::with_token(&token(), &config(&server.uri())).unwrap();
        let input = ClassificationInput::new("How do I log in?").unwrap();
        let err = strategy.classify(&input).await.unwrap_err();
        assert_eq!(err.ai_failure_kind(), Some(AiFailureKind::Credentials));
    }
}
