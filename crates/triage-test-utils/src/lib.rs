// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Triage integration tests.
//!
//! - [`MockStrategy`]: scripted AI strategy (verdicts, failures, delays)

pub mod mock_strategy;

pub use mock_strategy::{MockOutcome, MockStrategy};
