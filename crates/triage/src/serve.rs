// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage serve` and the wiring shared by every subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use triage_config::{LiveSettings, TriageConfig};
use triage_core::{ClassificationStrategy, TriageError};
use triage_engine::Orchestrator;
use triage_gateway::{start_server, AppState, ServerConfig};

use crate::reload;
use crate::shutdown;
use crate::ConfigSource;

/// Build the orchestrator for `config`.
///
/// The AI strategy is constructed whenever a token is available, even if
/// `use_ai_model` is currently false, so that flipping the flag in a
/// live-reloaded config takes effect without a restart.
pub fn build_orchestrator(
    config: &TriageConfig,
    settings: LiveSettings,
) -> Result<Orchestrator, TriageError> {
    let ai = build_ai_strategy(config)?;
    Ok(Orchestrator::new(ai, settings))
}

#[cfg(feature = "huggingface")]
fn build_ai_strategy(
    config: &TriageConfig,
) -> Result<Option<Arc<dyn ClassificationStrategy>>, TriageError> {
    let strategy = triage_huggingface::HuggingFaceClassifier::from_config(&config.huggingface)?;
    Ok(strategy.map(|s| Arc::new(s) as Arc<dyn ClassificationStrategy>))
}

#[cfg(not(feature = "huggingface"))]
fn build_ai_strategy(
    _config: &TriageConfig,
) -> Result<Option<Arc<dyn ClassificationStrategy>>, TriageError> {
    Ok(None)
}

/// Run the HTTP service until SIGINT or SIGTERM.
pub async fn run_serve(config: TriageConfig, source: ConfigSource) -> Result<(), TriageError> {
    let live = LiveSettings::new(config.engine.clone());
    let orchestrator = Arc::new(build_orchestrator(&config, live.clone())?);

    info!(
        ai_available = orchestrator.ai_available(),
        threshold = config.engine.confidence_threshold,
        ai_timeout_ms = config.engine.ai_timeout_ms,
        "classification engine ready"
    );
    if config.engine.use_ai_model && !orchestrator.ai_available() {
        warn!("AI model enabled but unavailable, serving rule-based classifications");
    }

    #[cfg_attr(not(feature = "prometheus"), allow(unused_mut))]
    let mut state = AppState::new(orchestrator);

    #[cfg(feature = "prometheus")]
    {
        match triage_prometheus::PrometheusExporter::install() {
            Ok(exporter) => {
                state = state.with_metrics(Arc::new(move || exporter.render()));
            }
            Err(e) => warn!(error = %e, "prometheus exporter unavailable, /metrics disabled"),
        }
    }

    // Held for the lifetime of the server.
    let _watcher = match source.watch_path() {
        Some(path) => match reload::watch(path, live, move || source.load()) {
            Ok(w) => Some(w),
            Err(e) => {
                warn!(error = %e, "config hot reload disabled");
                None
            }
        },
        None => None,
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        static_dir: config.server.static_dir.as_ref().map(PathBuf::from),
    };

    let cancel = shutdown::install_signal_handler();
    start_server(&server_config, state, cancel.cancelled_owned()).await
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Output goes to stderr so the
/// one-shot commands keep stdout clean.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triage={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
