// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triage - classify messages as question, comment or complaint.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod demo;
mod evaluate;
mod reload;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use triage_config::{ConfigError, TriageConfig};

/// Triage - classify messages as question, comment or complaint.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard lookup paths.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service.
    Serve,
    /// Classify a single message.
    Classify {
        /// Message text.
        text: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Classify a set of sample messages.
    Demo {
        /// Keep reading messages from stdin after the samples.
        #[arg(long, short)]
        interactive: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Report accuracy over a labelled JSON dataset.
    Evaluate {
        /// JSON array of `{"text": ..., "label": ...}` objects.
        dataset: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Validate configuration and print the effective engine settings.
    CheckConfig,
}

/// Where configuration comes from, for the initial load and for reloads.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Standard lookup paths plus environment.
    Hierarchy,
    /// One explicit file plus environment.
    File(PathBuf),
}

impl ConfigSource {
    pub fn load(&self) -> Result<TriageConfig, Vec<ConfigError>> {
        match self {
            ConfigSource::Hierarchy => triage_config::load_and_validate(),
            ConfigSource::File(path) => triage_config::load_and_validate_path(path),
        }
    }

    /// The file to watch for live engine changes, if one exists.
    pub fn watch_path(&self) -> Option<PathBuf> {
        match self {
            ConfigSource::Hierarchy => triage_config::resolve_config_path(),
            ConfigSource::File(path) => Some(path.clone()),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let source = match cli.config {
        Some(path) => ConfigSource::File(path),
        None => ConfigSource::Hierarchy,
    };

    let config = match source.load() {
        Ok(config) => config,
        Err(errors) => {
            triage_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.server.log_level);
            serve::run_serve(config, source).await
        }
        Some(Commands::Classify { text, json, plain }) => {
            serve::init_tracing("warn");
            demo::run_classify(&config, &text, json, plain).await
        }
        Some(Commands::Demo { interactive, plain }) => {
            serve::init_tracing("warn");
            demo::run_demo(&config, interactive, plain).await
        }
        Some(Commands::Evaluate {
            dataset,
            json,
            plain,
        }) => {
            serve::init_tracing("warn");
            evaluate::run_evaluate(&config, &dataset, json, plain).await
        }
        Some(Commands::CheckConfig) => {
            print_effective_config(&config, &source);
            Ok(())
        }
        None => {
            println!("triage: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_effective_config(config: &TriageConfig, source: &ConfigSource) {
    match source.watch_path() {
        Some(path) => println!("config file:          {}", path.display()),
        None => println!("config file:          (none, using defaults and environment)"),
    }
    println!("server:               {}:{}", config.server.host, config.server.port);
    println!("use_ai_model:         {}", config.engine.use_ai_model);
    println!("confidence_threshold: {}", config.engine.confidence_threshold);
    println!("ai_timeout_ms:        {}", config.engine.ai_timeout_ms);
    println!("model:                {}", config.huggingface.model);
    println!(
        "api token:            {}",
        if config.huggingface.api_token.is_some() {
            "configured"
        } else {
            "not in config (HF_API_TOKEN is consulted at startup)"
        }
    );
    println!("config OK");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_classify_with_flags() {
        let cli = Cli::try_parse_from(["triage", "classify", "hello there", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Classify { text, json, plain }) => {
                assert_eq!(text, "hello there");
                assert!(json);
                assert!(!plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["triage", "check-config", "--config", "/tmp/t.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    }

    #[test]
    fn cli_parses_evaluate_dataset() {
        let cli = Cli::try_parse_from(["triage", "evaluate", "data/sample.json", "--plain"]).unwrap();
        match cli.command {
            Some(Commands::Evaluate {
                dataset,
                json,
                plain,
            }) => {
                assert_eq!(dataset, PathBuf::from("data/sample.json"));
                assert!(!json);
                assert!(plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_source_watches_its_file() {
        let source = ConfigSource::File(PathBuf::from("/etc/custom.toml"));
        assert_eq!(source.watch_path(), Some(PathBuf::from("/etc/custom.toml")));
    }
}
