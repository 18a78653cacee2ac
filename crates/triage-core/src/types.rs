// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by every classification strategy.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TriageError;

/// Lower bound of the confidence scale.
pub const MIN_CONFIDENCE: f64 = 0.0;

/// Upper bound of the confidence scale.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// The three intents a message can be classified as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntentLabel {
    Question,
    Comment,
    Complaint,
}

impl IntentLabel {
    /// Every label, in declaration order.
    pub const ALL: [IntentLabel; 3] = [
        IntentLabel::Question,
        IntentLabel::Comment,
        IntentLabel::Complaint,
    ];

    /// Tie-break rank: complaint > question > comment.
    pub fn precedence(self) -> u8 {
        match self {
            IntentLabel::Complaint => 2,
            IntentLabel::Question => 1,
            IntentLabel::Comment => 0,
        }
    }
}

/// Which strategy produced the final label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Ai,
    Rules,
}

/// A message accepted for classification: trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInput {
    text: String,
}

impl ClassificationInput {
    /// Trim `text` and reject it if nothing is left.
    pub fn new(text: impl AsRef<str>) -> Result<Self, TriageError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TriageError::EmptyInput);
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    /// The trimmed message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters. Logged in place of the text itself.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// The output of a single strategy, before the escalation check.
///
/// Only [`Verdict::new`] builds one, so confidence is always within
/// `[MIN_CONFIDENCE, MAX_CONFIDENCE]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    label: IntentLabel,
    confidence: f64,
    reason: String,
    method: Method,
}

impl Verdict {
    /// Build a verdict, clamping confidence into range. NaN becomes 0.
    pub fn new(
        label: IntentLabel,
        confidence: f64,
        reason: impl Into<String>,
        method: Method,
    ) -> Self {
        Self {
            label,
            confidence: clamp_confidence(confidence),
            reason: reason.into(),
            method,
        }
    }

    pub fn label(&self) -> IntentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Replace the recorded method with the path that actually produced it.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Clamp a raw confidence into `[0, 100]`, mapping NaN to 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        MIN_CONFIDENCE
    } else {
        value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }
}

/// Final classification returned to callers.
///
/// Fields are private so a result cannot be altered after the escalation
/// check has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    label: IntentLabel,
    confidence: f64,
    reason: String,
    escalate: bool,
    method: Method,
}

impl ClassificationResult {
    /// Seal a verdict together with its escalation decision.
    pub fn from_verdict(verdict: Verdict, escalate: bool) -> Self {
        Self {
            label: verdict.label,
            confidence: verdict.confidence,
            reason: verdict.reason,
            escalate,
            method: verdict.method,
        }
    }

    pub fn label(&self) -> IntentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn escalate(&self) -> bool {
        self.escalate
    }

    pub fn method(&self) -> Method {
        self.method
    }
}

/// Health status reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but running on the fallback path.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn input_is_trimmed() {
        let input = ClassificationInput::new("  hello there \n").unwrap();
        assert_eq!(input.text(), "hello there");
        assert_eq!(input.char_count(), 11);
    }

    #[test]
    fn empty_and_whitespace_input_rejected() {
        assert!(matches!(
            ClassificationInput::new(""),
            Err(TriageError::EmptyInput)
        ));
        assert!(matches!(
            ClassificationInput::new("   \n\t  "),
            Err(TriageError::EmptyInput)
        ));
    }

    #[test]
    fn labels_round_trip_through_strings() {
        for label in IntentLabel::ALL {
            let parsed = IntentLabel::from_str(&label.to_string()).unwrap();
            assert_eq!(parsed, label);
        }
        assert_eq!(IntentLabel::Complaint.to_string(), "complaint");
        assert_eq!(Method::Ai.to_string(), "ai");
    }

    #[test]
    fn precedence_orders_complaint_first() {
        assert!(IntentLabel::Complaint.precedence() > IntentLabel::Question.precedence());
        assert!(IntentLabel::Question.precedence() > IntentLabel::Comment.precedence());
    }

    #[test]
    fn verdict_clamps_confidence() {
        let high = Verdict::new(IntentLabel::Question, 140.0, "r", Method::Rules);
        assert_eq!(high.confidence(), 100.0);
        let low = Verdict::new(IntentLabel::Question, -3.0, "r", Method::Rules);
        assert_eq!(low.confidence(), 0.0);
        let nan = Verdict::new(IntentLabel::Question, f64::NAN, "r", Method::Rules);
        assert_eq!(nan.confidence(), 0.0);
    }

    #[test]
    fn with_method_keeps_everything_else() {
        let v = Verdict::new(IntentLabel::Comment, 64.0, "positive sentiment detected", Method::Rules)
            .with_method(Method::Ai);
        assert_eq!(v.method(), Method::Ai);
        assert_eq!(v.label(), IntentLabel::Comment);
        assert_eq!(v.confidence(), 64.0);
        assert_eq!(v.reason(), "positive sentiment detected");
    }

    #[test]
    fn result_serializes_to_wire_shape() {
        let verdict = Verdict::new(
            IntentLabel::Complaint,
            62.5,
            "moderate negative sentiment detected",
            Method::Rules,
        );
        let result = ClassificationResult::from_verdict(verdict, true);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "label": "complaint",
                "confidence": 62.5,
                "reason": "moderate negative sentiment detected",
                "escalate": true,
                "method": "rules"
            })
        );
    }

    proptest::proptest! {
        #[test]
        fn clamped_confidence_always_in_range(raw in proptest::num::f64::ANY) {
            let c = clamp_confidence(raw);
            proptest::prop_assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&c));
        }
    }
}
