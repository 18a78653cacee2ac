// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification strategy trait shared by the AI adapter and the rule engine.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::types::{ClassificationInput, Method, Verdict};

/// A way of turning a message into a labelled verdict.
///
/// Implementations must be safe to call from many tasks at once and must
/// not keep per-call state between invocations.
#[async_trait]
pub trait ClassificationStrategy: Send + Sync + 'static {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// The method recorded on results produced by this strategy.
    fn method(&self) -> Method;

    /// Whether the strategy is ready to accept calls.
    fn is_available(&self) -> bool {
        true
    }

    /// Classify a single, already validated message.
    async fn classify(&self, input: &ClassificationInput) -> Result<Verdict, TriageError>;
}
