// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI-first classification with rule-engine fallback.
//!
//! Order of operations per call: validate input > snapshot settings >
//! AI strategy under a timeout (if enabled and available) > rule engine on
//! any AI failure > escalation check.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use triage_config::LiveSettings;
use triage_core::{
    AiFailureKind, ClassificationInput, ClassificationResult, ClassificationStrategy,
    HealthStatus, Method, TriageError, Verdict,
};

use crate::escalation::should_escalate;
use crate::rules::RuleEngine;

/// Composes the AI strategy and the rule engine.
///
/// Holds no per-call state; one instance serves all concurrent requests.
pub struct Orchestrator {
    ai: Option<Arc<dyn ClassificationStrategy>>,
    rules: RuleEngine,
    settings: LiveSettings,
}

impl Orchestrator {
    /// Create an orchestrator. `ai` is `None` when no provider is configured.
    pub fn new(ai: Option<Arc<dyn ClassificationStrategy>>, settings: LiveSettings) -> Self {
        Self {
            ai,
            rules: RuleEngine::new(),
            settings,
        }
    }

    /// An orchestrator that only ever uses the rule engine.
    pub fn rules_only(settings: LiveSettings) -> Self {
        Self::new(None, settings)
    }

    /// Shared handle to the live engine settings.
    pub fn settings(&self) -> &LiveSettings {
        &self.settings
    }

    /// Whether the AI path would be attempted right now.
    pub fn ai_available(&self) -> bool {
        self.settings.snapshot().use_ai_model
            && self.ai.as_ref().is_some_and(|ai| ai.is_available())
    }

    /// Healthy when the configured path is usable; degraded when AI is
    /// enabled but classification is running on rules alone.
    pub fn health(&self) -> HealthStatus {
        let enabled = self.settings.snapshot().use_ai_model;
        if !enabled || self.ai_available() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded("ai model unavailable, using rule-based fallback".to_string())
        }
    }

    /// Validate and classify raw text.
    ///
    /// The only error is [`TriageError::EmptyInput`]; AI failures fall back
    /// to the rule engine.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, TriageError> {
        let input = ClassificationInput::new(text)?;
        Ok(self.classify_input(&input).await)
    }

    /// Classify an already validated input. Never fails.
    pub async fn classify_input(&self, input: &ClassificationInput) -> ClassificationResult {
        let started = Instant::now();
        let settings = self.settings.snapshot();

        let verdict = match self.active_ai(settings.use_ai_model) {
            Some(ai) => match self.try_ai(ai.as_ref(), input, settings.ai_timeout()).await {
                Ok(verdict) => verdict.with_method(Method::Ai),
                Err(e) => {
                    let kind = e.ai_failure_kind().unwrap_or(AiFailureKind::ProviderError);
                    warn!(
                        kind = %kind,
                        chars = input.char_count(),
                        error = %e,
                        "ai classification failed, falling back to rules"
                    );
                    #[cfg(feature = "prometheus")]
                    triage_prometheus::record_ai_fallback(kind);
                    self.rules.evaluate(input).with_method(Method::Rules)
                }
            },
            None => self.rules.evaluate(input).with_method(Method::Rules),
        };

        let escalate = should_escalate(verdict.confidence(), settings.confidence_threshold);
        if escalate {
            info!(
                label = %verdict.label(),
                confidence = verdict.confidence(),
                threshold = settings.confidence_threshold,
                method = %verdict.method(),
                "low confidence, escalating for review"
            );
        } else {
            debug!(
                label = %verdict.label(),
                confidence = verdict.confidence(),
                method = %verdict.method(),
                "classified"
            );
        }

        #[cfg(feature = "prometheus")]
        {
            triage_prometheus::record_classification(verdict.label(), verdict.method());
            if escalate {
                triage_prometheus::record_escalation(verdict.label());
            }
            triage_prometheus::record_latency(started.elapsed().as_secs_f64());
        }
        #[cfg(not(feature = "prometheus"))]
        let _ = started;

        ClassificationResult::from_verdict(verdict, escalate)
    }

    fn active_ai(&self, enabled: bool) -> Option<&Arc<dyn ClassificationStrategy>> {
        if !enabled {
            return None;
        }
        self.ai.as_ref().filter(|ai| ai.is_available())
    }

    async fn try_ai(
        &self,
        ai: &dyn ClassificationStrategy,
        input: &ClassificationInput,
        budget: std::time::Duration,
    ) -> Result<Verdict, TriageError> {
        match tokio::time::timeout(budget, ai.classify(input)).await {
            Ok(result) => result,
            Err(_) => Err(TriageError::ai(
                AiFailureKind::Timeout,
                format!("{} did not answer within {}ms", ai.name(), budget.as_millis()),
            )),
        }
    }
}
