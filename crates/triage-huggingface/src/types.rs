// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Hugging Face Inference API text-classification task.

use serde::{Deserialize, Serialize};

/// Request body for `POST {base_url}/{model}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub inputs: String,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceOptions {
    /// Fail fast with 503 instead of blocking while a cold model loads.
    pub wait_for_model: bool,
}

impl InferenceRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            options: InferenceOptions {
                wait_for_model: false,
            },
        }
    }
}

/// One label/probability pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// Text-classification output.
///
/// The API returns one list per input; single-input calls may come back
/// either wrapped (`[[..]]`) or flat (`[..]`) depending on the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Nested(Vec<Vec<SentimentScore>>),
    Flat(Vec<SentimentScore>),
}

impl InferenceResponse {
    /// The highest scoring entry, if there is one.
    pub fn top(&self) -> Option<&SentimentScore> {
        let scores: &[SentimentScore] = match self {
            InferenceResponse::Nested(outer) => outer.first().map(Vec::as_slice).unwrap_or(&[]),
            InferenceResponse::Flat(scores) => scores,
        };
        scores.iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}
