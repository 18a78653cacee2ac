// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine settings that can be replaced while the service runs.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::diagnostic::ConfigError;
use crate::model::EngineConfig;
use crate::validation::validate_engine;

/// Shared handle to the current [`EngineConfig`].
///
/// Readers take a snapshot per classification with [`LiveSettings::snapshot`];
/// writers swap in a whole new value. Readers never block and never see a
/// half-updated config.
#[derive(Debug, Clone)]
pub struct LiveSettings {
    inner: Arc<ArcSwap<EngineConfig>>,
}

impl LiveSettings {
    /// Wrap an initial engine config. The caller is expected to have validated it.
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(engine)),
        }
    }

    /// The settings in effect right now.
    pub fn snapshot(&self) -> Arc<EngineConfig> {
        self.inner.load_full()
    }

    /// Validate and install new settings. Invalid settings leave the current ones in place.
    pub fn replace(&self, engine: EngineConfig) -> Result<(), Vec<ConfigError>> {
        validate_engine(&engine)?;
        let previous = self.inner.swap(Arc::new(engine));
        let current = self.inner.load();
        if *previous != **current {
            info!(
                threshold = current.confidence_threshold,
                use_ai_model = current.use_ai_model,
                ai_timeout_ms = current.ai_timeout_ms,
                "engine settings updated"
            );
        }
        Ok(())
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_is_visible_to_existing_clones() {
        let settings = LiveSettings::default();
        let reader = settings.clone();
        assert_eq!(reader.snapshot().confidence_threshold, 70.0);

        settings
            .replace(EngineConfig {
                confidence_threshold: 85.0,
                ..EngineConfig::default()
            })
            .unwrap();
        assert_eq!(reader.snapshot().confidence_threshold, 85.0);
    }

    #[test]
    fn invalid_replacement_is_rejected_and_ignored() {
        let settings = LiveSettings::default();
        let result = settings.replace(EngineConfig {
            confidence_threshold: 120.0,
            ..EngineConfig::default()
        });
        assert!(result.is_err());
        assert_eq!(settings.snapshot().confidence_threshold, 70.0);
    }

    #[test]
    fn old_snapshot_is_unaffected_by_replace() {
        let settings = LiveSettings::default();
        let before = settings.snapshot();
        settings
            .replace(EngineConfig {
                use_ai_model: false,
                ..EngineConfig::default()
            })
            .unwrap();
        assert!(before.use_ai_model);
        assert!(!settings.snapshot().use_ai_model);
    }
}
