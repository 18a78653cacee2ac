// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage evaluate`: accuracy report over a labelled dataset.
//!
//! The dataset is a JSON array of `{"text": ..., "label": ...}` objects.
//! Every example goes through the same orchestrator as `classify`, one
//! message per call.

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::warn;
use triage_config::{LiveSettings, TriageConfig};
use triage_core::{IntentLabel, Method, TriageError};
use triage_engine::Orchestrator;

use crate::serve::build_orchestrator;

/// Accuracy expected when any example was classified by the AI model.
pub const AI_ACCURACY_TARGET: f64 = 85.0;

/// Accuracy expected when every example fell back to rules.
pub const RULES_ACCURACY_TARGET: f64 = 70.0;

/// Misclassifications listed in the text report.
const SHOWN_ERRORS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct LabelledExample {
    pub text: String,
    pub label: IntentLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelStats {
    pub correct: usize,
    pub total: usize,
}

impl LabelStats {
    pub fn accuracy(&self) -> f64 {
        percent(self.correct, self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MethodCounts {
    pub ai: usize,
    pub rules: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Misclassification {
    pub text: String,
    pub expected: IntentLabel,
    pub predicted: IntentLabel,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    /// Examples with blank text, not classified.
    pub skipped: usize,
    pub accuracy: f64,
    pub average_confidence: f64,
    pub escalations: usize,
    pub methods: MethodCounts,
    pub by_label: BTreeMap<IntentLabel, LabelStats>,
    /// `confusion[expected][predicted]`, zero-filled for all labels.
    pub confusion: BTreeMap<IntentLabel, BTreeMap<IntentLabel, usize>>,
    pub target_accuracy: f64,
    pub meets_target: bool,
    pub misclassifications: Vec<Misclassification>,
}

/// Read and parse a dataset file.
pub fn load_dataset(path: &Path) -> Result<Vec<LabelledExample>, TriageError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| TriageError::Internal(format!("cannot read {}: {e}", path.display())))?;
    parse_dataset(&raw)
        .map_err(|e| TriageError::Internal(format!("invalid dataset {}: {e}", path.display())))
}

pub fn parse_dataset(raw: &str) -> Result<Vec<LabelledExample>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Classify every example and tally the results.
pub async fn evaluate(orchestrator: &Orchestrator, dataset: &[LabelledExample]) -> EvaluationReport {
    let mut confusion: BTreeMap<IntentLabel, BTreeMap<IntentLabel, usize>> = IntentLabel::ALL
        .into_iter()
        .map(|expected| (expected, IntentLabel::ALL.into_iter().map(|p| (p, 0)).collect()))
        .collect();
    let mut by_label: BTreeMap<IntentLabel, LabelStats> = BTreeMap::new();
    let mut methods = MethodCounts::default();
    let mut misclassifications = Vec::new();
    let (mut total, mut correct, mut skipped, mut escalations) = (0, 0, 0, 0);
    let mut confidence_sum = 0.0;

    for (index, example) in dataset.iter().enumerate() {
        let result = match orchestrator.classify(&example.text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(index, error = %e, "skipping dataset example");
                skipped += 1;
                continue;
            }
        };

        total += 1;
        confidence_sum += result.confidence();
        if result.escalate() {
            escalations += 1;
        }
        match result.method() {
            Method::Ai => methods.ai += 1,
            Method::Rules => methods.rules += 1,
        }

        let stats = by_label.entry(example.label).or_default();
        stats.total += 1;
        if result.label() == example.label {
            correct += 1;
            stats.correct += 1;
        } else {
            misclassifications.push(Misclassification {
                text: example.text.clone(),
                expected: example.label,
                predicted: result.label(),
                confidence: result.confidence(),
                reason: result.reason().to_string(),
            });
        }
        if let Some(row) = confusion.get_mut(&example.label) {
            *row.entry(result.label()).or_default() += 1;
        }
    }

    let accuracy = percent(correct, total);
    let target_accuracy = if methods.ai > 0 {
        AI_ACCURACY_TARGET
    } else {
        RULES_ACCURACY_TARGET
    };

    EvaluationReport {
        total,
        correct,
        skipped,
        accuracy,
        average_confidence: if total == 0 {
            0.0
        } else {
            confidence_sum / total as f64
        },
        escalations,
        methods,
        by_label,
        confusion,
        target_accuracy,
        meets_target: total > 0 && accuracy >= target_accuracy,
        misclassifications,
    }
}

/// Load `path`, evaluate it and print the report.
pub async fn run_evaluate(
    config: &TriageConfig,
    path: &Path,
    json: bool,
    plain: bool,
) -> Result<(), TriageError> {
    let dataset = load_dataset(path)?;
    let orchestrator = build_orchestrator(config, LiveSettings::new(config.engine.clone()))?;
    let report = evaluate(&orchestrator, &dataset).await;
    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| TriageError::Internal(format!("failed to serialize report: {e}")))?;
        println!("{out}");
    } else {
        let color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_report(&report, color));
    }
    Ok(())
}

/// Human-readable report.
pub fn render_report(report: &EvaluationReport, color: bool) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n  triage evaluation\n  {rule}\n"));
    out.push_str(&format!("  Examples:           {}", report.total));
    if report.skipped > 0 {
        out.push_str(&format!(" ({} skipped)", report.skipped));
    }
    out.push('\n');
    out.push_str(&format!("  Correct:            {}\n", report.correct));
    out.push_str(&format!("  Accuracy:           {:.2}%\n", report.accuracy));
    out.push_str(&format!(
        "  Average confidence: {:.2}%\n",
        report.average_confidence
    ));
    out.push_str(&format!(
        "  Escalations:        {} ({:.1}%)\n",
        report.escalations,
        percent(report.escalations, report.total)
    ));
    out.push_str(&format!(
        "  Method:             ai {} / rules {}\n",
        report.methods.ai, report.methods.rules
    ));

    out.push_str(&format!("\n  ACCURACY BY LABEL\n  {rule}\n"));
    for (label, stats) in &report.by_label {
        out.push_str(&format!(
            "  {:<10} {}/{} ({:.2}%)\n",
            label.to_string(),
            stats.correct,
            stats.total,
            stats.accuracy()
        ));
    }

    out.push_str(&format!("\n  CONFUSION MATRIX (rows: expected)\n  {rule}\n"));
    out.push_str(&format!("  {:<10}", ""));
    for label in IntentLabel::ALL {
        out.push_str(&format!(" {:>9}", label.to_string()));
    }
    out.push('\n');
    for (expected, row) in &report.confusion {
        out.push_str(&format!("  {:<10}", expected.to_string()));
        for label in IntentLabel::ALL {
            out.push_str(&format!(" {:>9}", row.get(&label).copied().unwrap_or(0)));
        }
        out.push('\n');
    }

    let verdict = if report.meets_target {
        let s = format!("PASS: accuracy meets the {:.0}% target", report.target_accuracy);
        if color { s.green().bold().to_string() } else { s }
    } else {
        let s = format!(
            "FAIL: accuracy is {:.2} points below the {:.0}% target",
            report.target_accuracy - report.accuracy,
            report.target_accuracy
        );
        if color { s.red().bold().to_string() } else { s }
    };
    out.push_str(&format!("\n  {verdict}\n"));

    if !report.misclassifications.is_empty() {
        out.push_str(&format!("\n  SAMPLE MISCLASSIFICATIONS\n  {rule}\n"));
        for (i, miss) in report
            .misclassifications
            .iter()
            .take(SHOWN_ERRORS)
            .enumerate()
        {
            let text: String = miss.text.chars().take(60).collect();
            out.push_str(&format!("  {}. \"{text}\"\n", i + 1));
            out.push_str(&format!(
                "     expected {} | predicted {} | {:.1}% | {}\n",
                miss.expected, miss.predicted, miss.confidence, miss.reason
            ));
        }
    }
    out
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
