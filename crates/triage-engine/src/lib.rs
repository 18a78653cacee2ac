// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification engine for the Triage service.
//!
//! This crate provides:
//! - [`RuleEngine`]: deterministic keyword scoring, infallible and offline
//! - [`should_escalate`]: the confidence threshold check
//! - [`Orchestrator`]: AI-first classification with automatic fallback to rules

pub mod escalation;
pub mod orchestrator;
pub mod rules;

pub use escalation::should_escalate;
pub use orchestrator::Orchestrator;
pub use rules::{RuleEngine, RuleFamily, ScoreBoard};
