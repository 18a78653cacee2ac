// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted stand-in for the AI classification strategy.
//!
//! `MockStrategy` implements [`ClassificationStrategy`] with queued outcomes,
//! so fallback and timeout paths can be driven without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use triage_core::{
    AiFailureKind, ClassificationInput, ClassificationStrategy, IntentLabel, Method, TriageError,
    Verdict,
};

/// One scripted response.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this verdict (method is always `ai`).
    Verdict {
        label: IntentLabel,
        confidence: f64,
        reason: String,
    },
    /// Fail with an AI error of this kind.
    Fail(AiFailureKind),
    /// Sleep, then produce the inner outcome.
    Delay(Duration, Box<MockOutcome>),
}

impl MockOutcome {
    pub fn verdict(label: IntentLabel, confidence: f64) -> Self {
        MockOutcome::Verdict {
            label,
            confidence,
            reason: format!("mock {label}"),
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        MockOutcome::Delay(delay, Box::new(self))
    }
}

/// A mock AI strategy that pops outcomes from a FIFO queue.
///
/// When the queue is empty it answers with the default outcome, which is
/// `comment` at 90 unless built with [`MockStrategy::always_failing`].
#[derive(Clone)]
pub struct MockStrategy {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    default_outcome: MockOutcome,
    available: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl MockStrategy {
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            default_outcome: MockOutcome::verdict(IntentLabel::Comment, 90.0),
            available: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A strategy whose every call fails with `kind`.
    pub fn always_failing(kind: AiFailureKind) -> Self {
        Self {
            default_outcome: MockOutcome::Fail(kind),
            ..Self::new()
        }
    }

    pub async fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Toggle what [`ClassificationStrategy::is_available`] reports.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `classify` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `classify` calls that ran to completion. A call whose
    /// future was dropped mid-delay is counted in `calls` but not here.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}

impl Default for MockStrategy {
    fn default() -> Self {
        Self::new()
    }
}

async fn resolve(outcome: MockOutcome) -> Result<Verdict, TriageError> {
    let mut outcome = outcome;
    loop {
        match outcome {
            MockOutcome::Verdict {
                label,
                confidence,
                reason,
            } => return Ok(Verdict::new(label, confidence, reason, Method::Ai)),
            MockOutcome::Fail(kind) => {
                return Err(TriageError::ai(kind, format!("mock failure: {kind}")));
            }
            MockOutcome::Delay(delay, inner) => {
                tokio::time::sleep(delay).await;
                outcome = *inner;
            }
        }
    }
}

#[async_trait]
impl ClassificationStrategy for MockStrategy {
    fn name(&self) -> &str {
        "mock-ai"
    }

    fn method(&self) -> Method {
        Method::Ai
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn classify(&self, _input: &ClassificationInput) -> Result<Verdict, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.next_outcome().await;
        let result = resolve(outcome).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ClassificationInput {
        ClassificationInput::new("anything").unwrap()
    }

    #[tokio::test]
    async fn default_outcome_when_queue_empty() {
        let mock = MockStrategy::new();
        let v = mock.classify(&input()).await.unwrap();
        assert_eq!(v.label(), IntentLabel::Comment);
        assert_eq!(v.method(), Method::Ai);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn queued_outcomes_in_order() {
        let mock = MockStrategy::with_outcomes(vec![
            MockOutcome::verdict(IntentLabel::Question, 88.0),
            MockOutcome::Fail(AiFailureKind::RateLimited),
        ]);
        assert_eq!(
            mock.classify(&input()).await.unwrap().label(),
            IntentLabel::Question
        );
        let err = mock.classify(&input()).await.unwrap_err();
        assert_eq!(err.ai_failure_kind(), Some(AiFailureKind::RateLimited));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_outcome_sleeps_first() {
        let mock = MockStrategy::with_outcomes(vec![MockOutcome::verdict(
            IntentLabel::Complaint,
            75.0,
        )
        .delayed(Duration::from_secs(10))]);
        let started = tokio::time::Instant::now();
        let v = mock.classify(&input()).await.unwrap();
        assert_eq!(v.label(), IntentLabel::Complaint);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(mock.completed(), 1);
    }

    #[tokio::test]
    async fn always_failing_keeps_failing() {
        let mock = MockStrategy::always_failing(AiFailureKind::Network);
        for _ in 0..3 {
            assert!(mock.classify(&input()).await.unwrap_err().is_ai_failure());
        }
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn availability_is_shared_between_clones() {
        let mock = MockStrategy::new();
        let clone = mock.clone();
        clone.set_available(false);
        assert!(!mock.is_available());
    }
}
