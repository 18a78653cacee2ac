// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Triage intent classifier.
//!
//! TOML files and environment variables are layered with Figment, checked
//! with `deny_unknown_fields` plus range validation, and reported as miette
//! diagnostics with typo suggestions. Engine settings can be swapped at
//! runtime through [`LiveSettings`].
//!
//! ```no_run
//! use triage_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("threshold: {}", config.engine.confidence_threshold);
//! ```

pub mod diagnostic;
pub mod live;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use live::LiveSettings;
pub use loader::{load_config, load_config_from_path, load_config_from_str, resolve_config_path};
pub use model::{EngineConfig, HuggingFaceConfig, ServerConfig, TriageConfig};

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<TriageConfig, Vec<ConfigError>> {
    validated(loader::load_config())
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<TriageConfig, Vec<ConfigError>> {
    validated(loader::load_config_from_str(toml_content))
}

/// Load configuration from one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<TriageConfig, Vec<ConfigError>> {
    validated(loader::load_config_from_path(path))
}

#[allow(clippy::result_large_err)]
fn validated(loaded: Result<TriageConfig, figment::Error>) -> Result<TriageConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
