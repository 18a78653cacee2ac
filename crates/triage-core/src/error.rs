// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Triage intent classifier.

use strum::Display;
use thiserror::Error;

/// Why the AI strategy could not produce a verdict.
///
/// The subtype only feeds log lines and metric labels. Control flow treats
/// every kind the same way: fall back to the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AiFailureKind {
    /// No AI strategy is configured, or it is disabled in settings.
    NotConfigured,
    /// Missing or rejected credentials (401/403).
    Credentials,
    /// Transport-level failure (DNS, connect, TLS, reset).
    Network,
    /// The provider did not answer within the configured budget.
    Timeout,
    /// Provider-side rate limiting (429).
    RateLimited,
    /// The hosted model is not loaded yet (503).
    ModelLoading,
    /// The response body could not be parsed or violated the expected shape.
    MalformedResponse,
    /// The provider returned a label we have no mapping for.
    UnmappedLabel,
    /// Any other non-success provider status.
    ProviderError,
}

/// The primary error type used across the Triage workspace.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The message was empty after trimming whitespace.
    #[error("text must not be empty")]
    EmptyInput,

    /// Configuration errors (invalid values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// The AI strategy failed. Always recoverable by falling back to rules.
    #[error("ai classifier unavailable ({kind}): {message}")]
    AiUnavailable {
        kind: AiFailureKind,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP server errors (bind failure, serve loop exit).
    #[error("http server error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriageError {
    /// Shorthand for an AI failure without an underlying source error.
    pub fn ai(kind: AiFailureKind, message: impl Into<String>) -> Self {
        TriageError::AiUnavailable {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when this error came from the AI path.
    pub fn is_ai_failure(&self) -> bool {
        matches!(self, TriageError::AiUnavailable { .. })
    }

    /// The AI failure subtype, if this is an AI failure.
    pub fn ai_failure_kind(&self) -> Option<AiFailureKind> {
        match self {
            TriageError::AiUnavailable { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
