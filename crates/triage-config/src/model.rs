// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Triage configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    /// HTTP service settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Classification engine settings. Hot-reloadable.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Hugging Face Inference API settings for the AI strategy.
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind. `0.0.0.0` accepts external connections.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`. `None` disables static files.
    #[serde(default)]
    pub static_dir: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Classification engine configuration.
///
/// This is the only section that can change while the service runs; see
/// [`crate::LiveSettings`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Try the AI strategy before the rule engine.
    #[serde(default = "default_use_ai_model")]
    pub use_ai_model: bool,

    /// Results with confidence strictly below this value are escalated.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Upper bound on a single AI call, in milliseconds.
    #[serde(default = "default_ai_timeout_ms")]
    pub ai_timeout_ms: u64,
}

impl EngineConfig {
    /// The AI call budget as a [`Duration`].
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_ai_model: default_use_ai_model(),
            confidence_threshold: default_confidence_threshold(),
            ai_timeout_ms: default_ai_timeout_ms(),
        }
    }
}

fn default_use_ai_model() -> bool {
    true
}

fn default_confidence_threshold() -> f64 {
    70.0
}

fn default_ai_timeout_ms() -> u64 {
    3000
}

/// Hugging Face Inference API configuration.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuggingFaceConfig {
    /// API token. `None` falls back to the `HF_API_TOKEN` environment variable.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Text-classification model id.
    #[serde(default = "default_model")]
    pub model: String,

    /// Inference API base URL; the model id is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Retries on 429/500/503. Zero keeps the whole call inside one timeout budget.
    #[serde(default)]
    pub max_retries: u32,

    /// Text longer than this is truncated before it is sent.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: default_model(),
            base_url: default_base_url(),
            max_retries: 0,
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl std::fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}

fn default_model() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_max_input_chars() -> usize {
    2000
}
