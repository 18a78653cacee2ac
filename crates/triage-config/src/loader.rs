// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./triage.toml` > `~/.config/triage/triage.toml` >
//! `/etc/triage/triage.toml`, with `TRIAGE_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TriageConfig;

/// System-wide config file.
const SYSTEM_CONFIG_PATH: &str = "/etc/triage/triage.toml";

/// Config file in the working directory.
const LOCAL_CONFIG_PATH: &str = "triage.toml";

/// Per-user config file under the XDG config directory.
fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("triage/triage.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/triage/triage.toml`
/// 3. `~/.config/triage/triage.toml`
/// 4. `./triage.toml`
/// 5. Bare legacy variables (`HOST`, `PORT`, `USE_AI_MODEL`, `CONFIDENCE_THRESHOLD`)
/// 6. `TRIAGE_*` environment variables
pub fn load_config() -> Result<TriageConfig, figment::Error> {
    build_figment().extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// The highest-priority config file that exists on disk, if any.
///
/// `triage serve` watches this file for engine setting changes.
pub fn resolve_config_path() -> Option<PathBuf> {
    [
        PathBuf::from(LOCAL_CONFIG_PATH),
        user_config_path(),
        PathBuf::from(SYSTEM_CONFIG_PATH),
    ]
    .into_iter()
    .find(|p| p.is_file())
}

/// `TRIAGE_<SECTION>_<KEY>` provider.
///
/// Section names are mapped explicitly with `map()` rather than
/// `split("_")`: `TRIAGE_ENGINE_AI_TIMEOUT_MS` must become
/// `engine.ai_timeout_ms`, not `engine.ai.timeout.ms`.
fn env_provider() -> Env {
    Env::prefixed("TRIAGE_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("server_", "server.", 1)
            .replacen("engine_", "engine.", 1)
            .replacen("huggingface_", "huggingface.", 1)
            .into()
    })
}

/// Unprefixed variables understood by earlier deployments of the service.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["HOST", "PORT", "USE_AI_MODEL", "CONFIDENCE_THRESHOLD"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "host" => "server.host".into(),
            "port" => "server.port".into(),
            "use_ai_model" => "engine.use_ai_model".into(),
            _ => "engine.confidence_threshold".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[engine]\nconfidence_threshold = 80\n")?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.engine.confidence_threshold, 80.0);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_path_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load_config_from_path(Path::new("/nonexistent/triage.toml"))?;
            assert_eq!(config.engine.confidence_threshold, 70.0);
            assert!(config.engine.use_ai_model);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_maps_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRIAGE_ENGINE_AI_TIMEOUT_MS", "1200");
            jail.set_env("TRIAGE_HUGGINGFACE_MAX_INPUT_CHARS", "512");
            let config = load_config()?;
            assert_eq!(config.engine.ai_timeout_ms, 1200);
            assert_eq!(config.huggingface.max_input_chars, 512);
            Ok(())
        });
    }

    #[test]
    fn legacy_env_vars_are_honoured() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORT", "9001");
            jail.set_env("USE_AI_MODEL", "false");
            jail.set_env("CONFIDENCE_THRESHOLD", "55");
            let config = load_config()?;
            assert_eq!(config.server.port, 9001);
            assert!(!config.engine.use_ai_model);
            assert_eq!(config.engine.confidence_threshold, 55.0);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_beats_legacy_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONFIDENCE_THRESHOLD", "55");
            jail.set_env("TRIAGE_ENGINE_CONFIDENCE_THRESHOLD", "65");
            let config = load_config()?;
            assert_eq!(config.engine.confidence_threshold, 65.0);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_resolved_and_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("triage.toml", "[server]\nport = 8123\n")?;
            assert_eq!(
                resolve_config_path().as_deref(),
                Some(Path::new(LOCAL_CONFIG_PATH))
            );
            let config = load_config()?;
            assert_eq!(config.server.port, 8123);
            Ok(())
        });
    }
}
