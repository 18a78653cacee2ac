// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Triage intent classifier.
//!
//! This crate provides the error type, the domain types and the
//! [`ClassificationStrategy`] trait used throughout the workspace. Both the
//! AI adapter and the rule engine implement the trait defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AiFailureKind, TriageError};
pub use traits::ClassificationStrategy;
pub use types::{
    ClassificationInput, ClassificationResult, HealthStatus, IntentLabel, Method, Verdict,
};
