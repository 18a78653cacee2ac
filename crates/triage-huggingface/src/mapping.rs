// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentiment model output to intent label.
//!
//! A sentiment model has no notion of "question", so interrogative form is
//! detected from the text itself; the model's label only separates
//! complaints from comments.

use triage_core::{AiFailureKind, IntentLabel, Method, TriageError, Verdict};

use crate::types::SentimentScore;

/// Words that open a question when they start the message.
const QUESTION_OPENERS: &[&str] = &[
    "what", "when", "where", "who", "whom", "whose", "which", "why", "how", "can", "could",
    "would", "should", "will", "do", "does", "did", "is", "are", "was", "were",
];

/// Substrings that mark a negative message as an explicit complaint.
const COMPLAINT_INDICATORS: &[&str] = &[
    "problem",
    "issue",
    "broken",
    "doesn't work",
    "not working",
    "terrible",
    "awful",
    "bad",
    "worst",
    "frustrated",
    "disappointed",
    "hate",
    "horrible",
    "useless",
    "never works",
    "keeps crashing",
    "want a refund",
    "unacceptable",
    "angry",
    "upset",
];

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "good",
    "love",
    "excellent",
    "amazing",
    "thanks",
    "appreciate",
    "awesome",
    "fantastic",
    "wonderful",
];

/// Confidence ceiling for model-derived labels.
const MAX_MODEL_CONFIDENCE: f64 = 95.0;

/// Map the provider's top sentiment onto an intent verdict.
///
/// Unknown sentiment labels are an error, never a guess.
pub fn map_sentiment(text: &str, sentiment: &SentimentScore) -> Result<Verdict, TriageError> {
    let polarity = Polarity::parse(&sentiment.label).ok_or_else(|| {
        TriageError::ai(
            AiFailureKind::UnmappedLabel,
            format!("unexpected sentiment label `{}`", sentiment.label),
        )
    })?;

    let lower = text.to_lowercase();
    let score = sentiment.score;

    if lower.contains('?') {
        return Ok(ai_verdict(
            IntentLabel::Question,
            85.0,
            "contains a question mark",
        ));
    }
    if starts_with_opener(&lower) {
        return Ok(ai_verdict(
            IntentLabel::Question,
            80.0,
            "starts with an interrogative word",
        ));
    }

    let verdict = match polarity {
        Polarity::Negative => {
            let explicit = COMPLAINT_INDICATORS.iter().any(|i| lower.contains(i));
            if explicit || score > 0.8 {
                ai_verdict(
                    IntentLabel::Complaint,
                    (score * 100.0).min(MAX_MODEL_CONFIDENCE),
                    format!("negative sentiment with complaint indicators (model score {score:.2})"),
                )
            } else {
                ai_verdict(
                    IntentLabel::Complaint,
                    (score * 80.0).min(75.0),
                    format!("negative sentiment (model score {score:.2})"),
                )
            }
        }
        Polarity::Positive | Polarity::Neutral => {
            let confidence = (score * 100.0).min(MAX_MODEL_CONFIDENCE);
            if POSITIVE_WORDS.iter().any(|w| lower.contains(w)) {
                ai_verdict(
                    IntentLabel::Comment,
                    confidence,
                    format!("positive sentiment (model score {score:.2})"),
                )
            } else {
                ai_verdict(
                    IntentLabel::Comment,
                    (confidence * 0.8).max(60.0),
                    format!("neutral observation or feedback (model score {score:.2})"),
                )
            }
        }
    };
    Ok(verdict)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Negative,
    Positive,
    Neutral,
}

impl Polarity {
    fn parse(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "NEGATIVE" => Some(Polarity::Negative),
            "POSITIVE" => Some(Polarity::Positive),
            "NEUTRAL" => Some(Polarity::Neutral),
            _ => None,
        }
    }
}

fn starts_with_opener(lower: &str) -> bool {
    lower
        .split_whitespace()
        .next()
        .is_some_and(|first| QUESTION_OPENERS.contains(&first))
        && lower.split_whitespace().nth(1).is_some()
}

fn ai_verdict(label: IntentLabel, confidence: f64, reason: impl Into<String>) -> Verdict {
    Verdict::new(label, confidence, reason, Method::Ai)
}
