// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage classify` and `triage demo` output.

use std::io::{BufRead, IsTerminal, Write};

use colored::Colorize;
use triage_config::{LiveSettings, TriageConfig};
use triage_core::{ClassificationResult, IntentLabel, TriageError};
use triage_engine::Orchestrator;

use crate::serve::build_orchestrator;

/// Width of the confidence bar in characters (one per two points).
const BAR_WIDTH: usize = 50;

const SAMPLES: &[(&str, &[&str])] = &[
    (
        "Clear questions",
        &[
            "How do I reset my password?",
            "What time does the store close?",
            "Can you help me with this error?",
        ],
    ),
    (
        "Positive comments",
        &[
            "I really love the new features!",
            "Great job on the update.",
            "This has been very helpful, thank you!",
        ],
    ),
    (
        "Obvious complaints",
        &[
            "This is terrible and never works!",
            "Very disappointed with the service.",
            "The app keeps crashing constantly.",
        ],
    ),
    (
        "Ambiguous cases",
        &[
            "Why is this so bad?",
            "Can someone please fix this bug?",
            "I'm not sure if this is working correctly.",
        ],
    ),
];

/// Classify one message and print it.
pub async fn run_classify(
    config: &TriageConfig,
    text: &str,
    json: bool,
    plain: bool,
) -> Result<(), TriageError> {
    let orchestrator = build_orchestrator(config, LiveSettings::new(config.engine.clone()))?;
    let result = orchestrator.classify(text).await?;
    if json {
        let out = serde_json::to_string_pretty(&result)
            .map_err(|e| TriageError::Internal(format!("failed to serialize result: {e}")))?;
        println!("{out}");
    } else {
        print!("{}", render(text, &result, use_color(plain)));
    }
    Ok(())
}

/// Classify the built-in samples, then optionally read messages from stdin.
pub async fn run_demo(
    config: &TriageConfig,
    interactive: bool,
    plain: bool,
) -> Result<(), TriageError> {
    let color = use_color(plain);
    let orchestrator = build_orchestrator(config, LiveSettings::new(config.engine.clone()))?;

    println!();
    println!("  triage demo");
    println!("  {}", "=".repeat(BAR_WIDTH + 10));
    if orchestrator.ai_available() {
        println!("  AI model: enabled ({})", config.huggingface.model);
    } else {
        println!("  AI model: disabled (rule-based fallback)");
    }
    println!(
        "  Confidence threshold: {:.0}%",
        config.engine.confidence_threshold
    );

    for (category, texts) in SAMPLES {
        println!();
        println!("  {}", category.to_uppercase());
        println!("  {}", "=".repeat(BAR_WIDTH + 10));
        for text in *texts {
            let result = orchestrator.classify(text).await?;
            print!("{}", render(text, &result, color));
        }
    }

    if interactive {
        interactive_loop(&orchestrator, color).await?;
    }
    Ok(())
}

async fn interactive_loop(orchestrator: &Orchestrator, color: bool) -> Result<(), TriageError> {
    println!();
    println!("  Type a message to classify, or `quit` to exit.");
    let stdin = std::io::stdin();
    loop {
        print!("\n> ");
        std::io::stdout()
            .flush()
            .map_err(|e| TriageError::Internal(format!("stdout: {e}")))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| TriageError::Internal(format!("stdin: {e}")))?;
        let text = line.trim();
        if read == 0 || matches!(text.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if text.is_empty() {
            continue;
        }
        let result = orchestrator.classify(text).await?;
        print!("{}", render(text, &result, color));
    }
    Ok(())
}

fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// `[=====-----]` with one `=` per two confidence points.
pub fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence / 2.0) as usize).min(BAR_WIDTH);
    format!("[{}{}]", "=".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Human-readable block for one result.
pub fn render(text: &str, result: &ClassificationResult, color: bool) -> String {
    let label = result.label().to_string().to_uppercase();
    let label = if color {
        match result.label() {
            IntentLabel::Question => label.cyan().bold().to_string(),
            IntentLabel::Comment => label.green().bold().to_string(),
            IntentLabel::Complaint => label.red().bold().to_string(),
        }
    } else {
        label
    };

    let escalation = if result.escalate() {
        let s = "yes, low confidence, needs human review";
        if color { s.yellow().to_string() } else { s.to_string() }
    } else {
        "no".to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("\n  Input:      \"{text}\"\n"));
    out.push_str(&format!("  Label:      {label}\n"));
    out.push_str(&format!(
        "  Confidence: {:5.1}% {}\n",
        result.confidence(),
        confidence_bar(result.confidence())
    ));
    out.push_str(&format!("  Reason:     {}\n", result.reason()));
    out.push_str(&format!("  Escalate:   {escalation}\n"));
    out.push_str(&format!("  Method:     {}\n", result.method()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Method, Verdict};

    #[test]
    fn bar_scales_and_saturates() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", "-".repeat(50)));
        assert_eq!(confidence_bar(100.0), format!("[{}]", "=".repeat(50)));
        let half = confidence_bar(50.0);
        assert_eq!(half.matches('=').count(), 25);
    }

    #[test]
    fn plain_render_lists_every_field() {
        let result = ClassificationResult::from_verdict(
            Verdict::new(IntentLabel::Complaint, 45.0, "negative sentiment detected", Method::Rules),
            true,
        );
        let out = render("meh", &result, false);
        assert!(out.contains("COMPLAINT"));
        assert!(out.contains("45.0%"));
        assert!(out.contains("negative sentiment detected"));
        assert!(out.contains("needs human review"));
        assert!(out.contains("Method:     rules"));
    }

    #[tokio::test]
    async fn demo_runs_on_rules_alone() {
        let mut config = TriageConfig::default();
        config.engine.use_ai_model = false;
        run_demo(&config, false, true).await.unwrap();
    }
}
