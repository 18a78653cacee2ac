// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config file watching for live engine settings.
//!
//! Only the `[engine]` section is applied at runtime. Server and provider
//! changes need a restart and are ignored here.

use std::path::PathBuf;
use std::time::Duration;

use notify::{RecommendedWatcher, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use tracing::{debug, info, warn};
use triage_config::{ConfigError, LiveSettings, TriageConfig};
use triage_core::TriageError;

/// Quiet period before a burst of file events is acted on.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Keeps the file watcher alive. Dropping it stops watching.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

/// Watch `path` and push valid engine settings into `live` on change.
///
/// The parent directory is watched so editors that save by rename are
/// still noticed.
pub fn watch<F>(path: PathBuf, live: LiveSettings, load: F) -> Result<ConfigWatcher, TriageError>
where
    F: Fn() -> Result<TriageConfig, Vec<ConfigError>> + Send + 'static,
{
    let file_name = path.file_name().map(|n| n.to_os_string());
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut debouncer = new_debouncer(DEBOUNCE, move |res: DebounceEventResult| match res {
        Ok(events) => {
            let touched = events
                .iter()
                .any(|e| e.path.file_name().map(|n| n.to_os_string()) == file_name);
            if touched {
                apply(&live, load());
            }
        }
        Err(e) => warn!(error = %e, "config watcher error"),
    })
    .map_err(|e| TriageError::Config(format!("failed to start config watcher: {e}")))?;

    debouncer
        .watcher()
        .watch(&dir, notify::RecursiveMode::NonRecursive)
        .map_err(|e| TriageError::Config(format!("failed to watch {}: {e}", dir.display())))?;

    info!(path = %path.display(), "watching config for engine setting changes");
    Ok(ConfigWatcher {
        _debouncer: debouncer,
    })
}

/// Apply a reload result. Invalid configs leave the current settings untouched.
pub fn apply(live: &LiveSettings, loaded: Result<TriageConfig, Vec<ConfigError>>) {
    let errors = match loaded {
        Ok(config) => match live.replace(config.engine) {
            Ok(()) => {
                debug!("config reloaded");
                return;
            }
            Err(errors) => errors,
        },
        Err(errors) => errors,
    };
    for error in &errors {
        warn!(error = %error, "ignoring invalid config change");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_config::load_and_validate_str;

    #[test]
    fn valid_reload_replaces_engine_settings() {
        let live = LiveSettings::default();
        apply(
            &live,
            load_and_validate_str("[engine]\nconfidence_threshold = 82\n"),
        );
        assert_eq!(live.snapshot().confidence_threshold, 82.0);
    }

    #[test]
    fn invalid_reload_keeps_previous_settings() {
        let live = LiveSettings::default();
        apply(
            &live,
            load_and_validate_str("[engine]\nconfidence_threshold = 500\n"),
        );
        apply(&live, load_and_validate_str("[engine]\nthreshold = 50\n"));
        assert_eq!(live.snapshot().confidence_threshold, 70.0);
    }

    #[test]
    fn edits_to_watched_file_reach_live_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triage.toml");
        std::fs::write(&path, "[engine]\nconfidence_threshold = 70\n").unwrap();

        let live = LiveSettings::default();
        let reload_path = path.clone();
        let _watcher = watch(path.clone(), live.clone(), move || {
            let content = std::fs::read_to_string(&reload_path)
                .map_err(|e| vec![ConfigError::Other(e.to_string())])?;
            load_and_validate_str(&content)
        })
        .unwrap();

        std::fs::write(&path, "[engine]\nconfidence_threshold = 88\n").unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while live.snapshot().confidence_threshold != 88.0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        assert_eq!(live.snapshot().confidence_threshold, 88.0);
    }
}
