// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Recording goes through the metrics-rs facade. Without an installed
//! recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};
use triage_core::{AiFailureKind, IntentLabel, Method};

/// Register all Triage metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "triage_classifications_total",
        "Classifications returned, by label and method"
    );
    describe_counter!(
        "triage_escalations_total",
        "Classifications flagged for human review"
    );
    describe_counter!(
        "triage_ai_fallbacks_total",
        "AI attempts that fell back to the rule engine, by failure kind"
    );
    describe_histogram!(
        "triage_classification_latency_seconds",
        "End-to-end classification latency in seconds"
    );
}

/// Record a finished classification.
pub fn record_classification(label: IntentLabel, method: Method) {
    metrics::counter!(
        "triage_classifications_total",
        "label" => label.to_string(),
        "method" => method.to_string()
    )
    .increment(1);
}

/// Record an escalated result.
pub fn record_escalation(label: IntentLabel) {
    metrics::counter!("triage_escalations_total", "label" => label.to_string()).increment(1);
}

/// Record a fallback from the AI strategy to rules.
pub fn record_ai_fallback(kind: AiFailureKind) {
    metrics::counter!("triage_ai_fallbacks_total", "kind" => kind.to_string()).increment(1);
}

/// Record end-to-end classification latency.
pub fn record_latency(seconds: f64) {
    metrics::histogram!("triage_classification_latency_seconds").record(seconds);
}
