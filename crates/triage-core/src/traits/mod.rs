// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable classification strategies.

pub mod strategy;

pub use strategy::ClassificationStrategy;
