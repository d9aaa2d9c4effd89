//! CLI commands

pub mod completions;
pub mod config;
pub mod run;
pub mod status;

use anyhow::{Context, Result};
use clap::Subcommand;
use dedup_core::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process new batches (default)
    Run(run::RunArgs),

    /// Show registry, ledger and pending batches
    Status(status::StatusArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Config files looked up, in order, when `--config` is not given
pub const CONFIG_CANDIDATES: [&str; 2] = ["settings/settings.toml", "domain-dedup.toml"];

/// Load the explicit config file, else the first candidate found, else defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match find_config_file() {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
