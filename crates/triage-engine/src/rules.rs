// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword and pattern scoring.
//!
//! Every rule family contributes its weight at most once per message.
//! Interrogative words count once per distinct word.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;
use triage_core::{
    ClassificationInput, ClassificationStrategy, IntentLabel, Method, TriageError, Verdict,
};

/// Confidence reported when no rule fired at all.
pub const NO_SIGNAL_CONFIDENCE: f64 = 30.0;

/// Interrogative words; each distinct one contributes separately.
const INTERROGATIVES: &[&str] = &["who", "what", "where", "when", "why", "how"];

/// Auxiliary verbs that open a yes/no question.
const AUXILIARIES: &[&str] = &[
    "can", "could", "would", "should", "will", "is", "are", "do", "does", "did", "have", "has",
];

const POLITE_REQUESTS: &[&str] = &[
    "could you",
    "can you",
    "can i",
    "could i",
    "would you",
    "may i",
    "is there a way",
    "do you know",
];

const STRONG_NEGATIVES: &[&str] = &[
    "terrible",
    "awful",
    "horrible",
    "worst",
    "useless",
    "unacceptable",
    "ridiculous",
    "pathetic",
    "hate",
];

const MODERATE_NEGATIVES: &[&str] = &[
    "bad",
    "broken",
    "doesn't",
    "poor",
    "failed",
    "bug",
    "error",
    "issue",
    "problem",
    "crash",
    "wrong",
    "disappointed",
    "slow",
];

const PROBLEM_PHRASES: &[&str] = &[
    "doesn't work",
    "does not work",
    "not working",
    "never works",
    "won't work",
    "keeps crashing",
    "want a refund",
    "can't use",
];

const POSITIVES: &[&str] = &[
    "great",
    "love",
    "awesome",
    "good",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "nice",
    "perfect",
    "helpful",
    "happy",
];

const GRATITUDE: &[&str] = &["thanks", "thank you", "appreciate", "grateful", "cheers"];

const NEUTRAL_CUES: &[&str] = &[
    "i think",
    "i believe",
    "in my opinion",
    "i feel",
    "just wanted to",
    "i noticed",
    "fyi",
    "by the way",
];

/// Words: letters, digits and inner apostrophes.
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)*").unwrap());

static FRUSTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:i\s+am|i'm|i\s+was|i\s+have\s+been|i've\s+been)\s+(?:\w+\s+)?(?:frustrated|disappointed|upset|angry|unhappy|annoyed)\b",
    )
    .unwrap()
});

/// A named group of rules that all feed one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleFamily {
    Interrogative,
    QuestionMark,
    PoliteRequest,
    LeadingAuxiliary,
    StrongNegative,
    ModerateNegative,
    ProblemPhrase,
    Frustration,
    Exclamation,
    Positive,
    Gratitude,
    NeutralObservation,
}

impl RuleFamily {
    /// The label this family scores for.
    pub fn label(self) -> IntentLabel {
        match self {
            RuleFamily::Interrogative
            | RuleFamily::QuestionMark
            | RuleFamily::PoliteRequest
            | RuleFamily::LeadingAuxiliary => IntentLabel::Question,
            RuleFamily::StrongNegative
            | RuleFamily::ModerateNegative
            | RuleFamily::ProblemPhrase
            | RuleFamily::Frustration
            | RuleFamily::Exclamation => IntentLabel::Complaint,
            RuleFamily::Positive | RuleFamily::Gratitude | RuleFamily::NeutralObservation => {
                IntentLabel::Comment
            }
        }
    }

    /// Weight contributed each time the family fires.
    pub fn weight(self) -> u32 {
        match self {
            RuleFamily::Interrogative => 20,
            RuleFamily::QuestionMark => 15,
            RuleFamily::PoliteRequest => 15,
            RuleFamily::LeadingAuxiliary => 15,
            RuleFamily::StrongNegative => 25,
            RuleFamily::ModerateNegative => 20,
            RuleFamily::ProblemPhrase => 25,
            RuleFamily::Frustration => 20,
            RuleFamily::Exclamation => 15,
            RuleFamily::Positive => 20,
            RuleFamily::Gratitude => 15,
            RuleFamily::NeutralObservation => 10,
        }
    }

    /// Phrase used when this family is cited in a reason string.
    pub fn describe(self) -> &'static str {
        match self {
            RuleFamily::Interrogative => "interrogative word",
            RuleFamily::QuestionMark => "question mark",
            RuleFamily::PoliteRequest => "polite request",
            RuleFamily::LeadingAuxiliary => "question word order",
            RuleFamily::StrongNegative => "strong negative sentiment",
            RuleFamily::ModerateNegative => "negative sentiment",
            RuleFamily::ProblemPhrase => "problem phrase",
            RuleFamily::Frustration => "expressed frustration",
            RuleFamily::Exclamation => "exclamation",
            RuleFamily::Positive => "positive sentiment",
            RuleFamily::Gratitude => "gratitude",
            RuleFamily::NeutralObservation => "neutral observation",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// One rule family firing, with its total contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit {
    pub family: RuleFamily,
    pub points: u32,
}

/// Accumulated per-label scores for one message.
///
/// All three labels are always present; a label nothing fired for scores 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    question: u32,
    comment: u32,
    complaint: u32,
    hits: Vec<RuleHit>,
}

impl ScoreBoard {
    fn add(&mut self, family: RuleFamily, points: u32) {
        if points == 0 {
            return;
        }
        *self.slot(family.label()) += points;
        self.hits.push(RuleHit { family, points });
    }

    fn slot(&mut self, label: IntentLabel) -> &mut u32 {
        match label {
            IntentLabel::Question => &mut self.question,
            IntentLabel::Comment => &mut self.comment,
            IntentLabel::Complaint => &mut self.complaint,
        }
    }

    /// Raw score for `label`.
    pub fn score(&self, label: IntentLabel) -> u32 {
        match label {
            IntentLabel::Question => self.question,
            IntentLabel::Comment => self.comment,
            IntentLabel::Complaint => self.complaint,
        }
    }

    /// Rule families that fired, in evaluation order.
    pub fn hits(&self) -> &[RuleHit] {
        &self.hits
    }

    /// Sum of all three scores.
    pub fn total(&self) -> u32 {
        self.question + self.comment + self.complaint
    }

    /// Labels ordered best first: score descending, then precedence.
    pub fn ranked(&self) -> [(IntentLabel, u32); 3] {
        let mut ranked = IntentLabel::ALL.map(|label| (label, self.score(label)));
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.0.precedence().cmp(&a.0.precedence()))
        });
        ranked
    }

    /// Families that fired for `label`, largest contribution first.
    pub fn contributors(&self, label: IntentLabel) -> Vec<RuleHit> {
        let mut hits: Vec<RuleHit> = self
            .hits
            .iter()
            .copied()
            .filter(|h| h.family.label() == label)
            .collect();
        // Stable sort keeps evaluation order among equal contributions.
        hits.sort_by(|a, b| b.points.cmp(&a.points));
        hits
    }
}

/// Lowercased message plus the views the rules match against.
struct Normalized {
    /// Lowercase text with typographic apostrophes folded to `'`.
    lower: String,
    /// Lowercase words joined by single spaces and padded with one space on
    /// each side, so phrases match on word boundaries via `contains`.
    padded: String,
    words: Vec<String>,
}

impl Normalized {
    fn new(text: &str) -> Self {
        let lower = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
        let words: Vec<String> = WORD
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect();
        let padded = format!(" {} ", words.join(" "));
        Self {
            lower,
            padded,
            words,
        }
    }

    fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    fn has_phrase(&self, phrase: &str) -> bool {
        self.padded.contains(&format!(" {phrase} "))
    }

    fn any_phrase(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has_phrase(p))
    }
}

/// The deterministic fallback classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score `text` against every rule family.
    pub fn score(&self, text: &str) -> ScoreBoard {
        let norm = Normalized::new(text);
        let mut board = ScoreBoard::default();

        // Question.
        let distinct: BTreeSet<&str> = norm
            .words
            .iter()
            .map(String::as_str)
            .filter(|w| INTERROGATIVES.contains(w))
            .collect();
        board.add(
            RuleFamily::Interrogative,
            RuleFamily::Interrogative.weight() * distinct.len() as u32,
        );
        if norm.lower.contains('?') {
            board.add(RuleFamily::QuestionMark, RuleFamily::QuestionMark.weight());
        }
        if norm.any_phrase(POLITE_REQUESTS) {
            board.add(RuleFamily::PoliteRequest, RuleFamily::PoliteRequest.weight());
        }
        if norm
            .words
            .first()
            .is_some_and(|w| AUXILIARIES.contains(&w.as_str()))
        {
            board.add(
                RuleFamily::LeadingAuxiliary,
                RuleFamily::LeadingAuxiliary.weight(),
            );
        }

        // Complaint.
        if STRONG_NEGATIVES.iter().any(|w| norm.has_word(w)) {
            board.add(RuleFamily::StrongNegative, RuleFamily::StrongNegative.weight());
        }
        if MODERATE_NEGATIVES.iter().any(|w| norm.has_word(w)) {
            board.add(
                RuleFamily::ModerateNegative,
                RuleFamily::ModerateNegative.weight(),
            );
        }
        if norm.any_phrase(PROBLEM_PHRASES) {
            board.add(RuleFamily::ProblemPhrase, RuleFamily::ProblemPhrase.weight());
        }
        if FRUSTRATION.is_match(&norm.lower) {
            board.add(RuleFamily::Frustration, RuleFamily::Frustration.weight());
        }
        if norm.lower.contains('!') {
            board.add(RuleFamily::Exclamation, RuleFamily::Exclamation.weight());
        }

        // Comment.
        if POSITIVES.iter().any(|w| norm.has_word(w)) {
            board.add(RuleFamily::Positive, RuleFamily::Positive.weight());
        }
        if norm.any_phrase(GRATITUDE) {
            board.add(RuleFamily::Gratitude, RuleFamily::Gratitude.weight());
        }
        if norm.any_phrase(NEUTRAL_CUES) {
            board.add(
                RuleFamily::NeutralObservation,
                RuleFamily::NeutralObservation.weight(),
            );
        }

        board
    }

    /// Classify a validated message. Never fails.
    pub fn evaluate(&self, input: &ClassificationInput) -> Verdict {
        let board = self.score(input.text());
        debug!(
            chars = input.char_count(),
            question = board.score(IntentLabel::Question),
            comment = board.score(IntentLabel::Comment),
            complaint = board.score(IntentLabel::Complaint),
            "rule scores"
        );
        verdict_from(&board)
    }
}

/// Turn a score board into a verdict.
///
/// Confidence is `2 * winner - runner_up`, clamped to `[0, 100]`: a lone
/// signal of 35 points reads as 70, and a contested win reads lower.
pub fn verdict_from(board: &ScoreBoard) -> Verdict {
    let [(label, winner), (_, runner_up), _] = board.ranked();

    if winner == 0 {
        return Verdict::new(
            IntentLabel::Comment,
            NO_SIGNAL_CONFIDENCE,
            "no strong signal found, defaulting to comment",
            Method::Rules,
        );
    }

    let confidence = 2.0 * f64::from(winner) - f64::from(runner_up);
    Verdict::new(label, confidence, reason_for(board, label), Method::Rules)
}

fn reason_for(board: &ScoreBoard, label: IntentLabel) -> String {
    let top: Vec<&str> = board
        .contributors(label)
        .iter()
        .take(2)
        .map(|h| h.family.describe())
        .collect();
    format!("{} detected", top.join(" and "))
}

#[async_trait]
impl ClassificationStrategy for RuleEngine {
    fn name(&self) -> &str {
        "rules"
    }

    fn method(&self) -> Method {
        Method::Rules
    }

    async fn classify(&self, input: &ClassificationInput) -> Result<Verdict, TriageError> {
        Ok(self.evaluate(input))
    }
}
