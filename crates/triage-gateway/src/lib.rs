// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP service for the Triage intent classifier.
//!
//! Exposes the orchestrator over a small JSON API alongside health,
//! metrics and an optional static demo page.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, AppState, ServerConfig, MAX_BODY_BYTES};
