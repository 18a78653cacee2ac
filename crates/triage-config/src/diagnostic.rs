// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Turns Figment extraction failures and validation failures into miette
//! diagnostics, including "did you mean?" hints for misspelled keys.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section defines.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(triage::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
    },

    /// A value of the wrong type, e.g. a string where a number is expected.
    #[error("invalid type for key `{key}`: found {found}")]
    #[diagnostic(code(triage::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    /// A required key with no default.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(triage::config::missing_key),
        help("add `{key} = <value>` to triage.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but is out of range or otherwise unusable.
    #[error("validation error: {message}")]
    #[diagnostic(code(triage::config::validation))]
    Validation { message: String },

    /// Anything else Figment reports (unreadable file, bad TOML syntax).
    #[error("configuration error: {0}")]
    #[diagnostic(code(triage::config::other))]
    Other(String),
}

impl ConfigError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by a `figment::Error` into a [`ConfigError`].
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let dotted = error.path.join(".");
            match &error.kind {
                Kind::UnknownField(field, expected) => ConfigError::UnknownKey {
                    key: qualify(&dotted, field),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                },
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: qualify(&dotted, field),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: dotted,
                    found: actual.to_string(),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Join a section path and a field name, skipping duplicated segments.
fn qualify(section: &str, field: &str) -> String {
    if section.is_empty() {
        field.to_string()
    } else if section == field || section.ends_with(&format!(".{field}")) {
        section.to_string()
    } else {
        format!("{section}.{field}")
    }
}

/// Best valid key above [`SUGGESTION_THRESHOLD`], if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["use_ai_model", "confidence_threshold", "ai_timeout_ms"];
        assert_eq!(
            suggest_key("confidence_treshold", valid),
            Some("confidence_threshold".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_unrelated_key() {
        let valid = &["host", "port", "static_dir", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn qualify_joins_section_and_field() {
        assert_eq!(qualify("engine", "ai_timeout"), "engine.ai_timeout");
        assert_eq!(qualify("", "engine"), "engine");
        assert_eq!(qualify("engine.ai_timeout", "ai_timeout"), "engine.ai_timeout");
    }

    #[test]
    fn unknown_field_becomes_unknown_key_with_suggestion() {
        let err = crate::loader::load_config_from_str("[engine]\nconfidence_treshold = 50\n")
            .unwrap_err();
        let errors = figment_to_config_errors(err);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => {
                assert!(key.contains("confidence_treshold"), "got key {key}");
                assert_eq!(suggestion.as_deref(), Some("confidence_threshold"));
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn wrong_type_becomes_invalid_type() {
        let err = crate::loader::load_config_from_str("[server]\nport = \"eighty\"\n").unwrap_err();
        let errors = figment_to_config_errors(err);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
            "got {errors:?}"
        );
    }
}
