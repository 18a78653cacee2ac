// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Range and format checks that serde attributes cannot express. All
//! problems are collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::{EngineConfig, HuggingFaceConfig, ServerConfig, TriageConfig};

/// Longest AI call budget we accept. Anything slower defeats the fallback.
pub const MAX_AI_TIMEOUT_MS: u64 = 30_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a full configuration.
pub fn validate_config(config: &TriageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    check_server(&config.server, &mut errors);
    check_engine(&config.engine, &mut errors);
    check_huggingface(&config.huggingface, &mut errors);
    finish(errors)
}

/// Validate only the engine section. Used when reloading at runtime.
pub fn validate_engine(engine: &EngineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    check_engine(engine, &mut errors);
    finish(errors)
}

fn finish(errors: Vec<ConfigError>) -> Result<(), Vec<ConfigError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_server(server: &ServerConfig, errors: &mut Vec<ConfigError>) {
    if server.host.trim().is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    }

    if server.port == 0 {
        errors.push(ConfigError::validation(
            "server.port must be between 1 and 65535, got 0",
        ));
    }

    if !LOG_LEVELS.contains(&server.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "server.log_level `{}` is not one of {}",
            server.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if let Some(dir) = &server.static_dir {
        if dir.trim().is_empty() {
            errors.push(ConfigError::validation(
                "server.static_dir must not be empty when set",
            ));
        }
    }
}

fn check_engine(engine: &EngineConfig, errors: &mut Vec<ConfigError>) {
    let threshold = engine.confidence_threshold;
    if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
        errors.push(ConfigError::validation(format!(
            "engine.confidence_threshold must be between 0 and 100, got {threshold}"
        )));
    }

    if engine.ai_timeout_ms == 0 || engine.ai_timeout_ms > MAX_AI_TIMEOUT_MS {
        errors.push(ConfigError::validation(format!(
            "engine.ai_timeout_ms must be between 1 and {MAX_AI_TIMEOUT_MS}, got {}",
            engine.ai_timeout_ms
        )));
    }
}

fn check_huggingface(hf: &HuggingFaceConfig, errors: &mut Vec<ConfigError>) {
    if hf.model.trim().is_empty() {
        errors.push(ConfigError::validation("huggingface.model must not be empty"));
    }

    if !(hf.base_url.starts_with("http://") || hf.base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "huggingface.base_url `{}` must start with http:// or https://",
            hf.base_url
        )));
    }

    if hf.max_input_chars == 0 {
        errors.push(ConfigError::validation(
            "huggingface.max_input_chars must be at least 1",
        ));
    }
}
