// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation policy.

/// Whether a result needs human review.
///
/// Strictly below the threshold escalates; exactly at the threshold does not.
pub fn should_escalate(confidence: f64, threshold: f64) -> bool {
    confidence < threshold
}
