//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use dedup_core::Config;
use std::path::PathBuf;
use tracing::info;

use super::CONFIG_CANDIDATES;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Generate a configuration file with default values
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "settings/settings.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },

    /// Show config file locations
    Paths,
}

/// Execute config command
pub fn execute(args: ConfigArgs, config: Config) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(&config),
        ConfigAction::Generate { output, force } => generate_config(output, force),
        ConfigAction::Validate { file } => validate_config(file),
        ConfigAction::Paths => show_paths(),
    }
}

fn show_config(config: &Config) -> Result<()> {
    let toml_str = config.to_toml().context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

fn generate_config(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let toml_str = Config::default()
        .to_toml()
        .context("Failed to serialize config")?;

    // Add header comment
    let content = format!(
        "# Domain Dedup Configuration\n\
         # Relative paths are resolved from the working directory\n\n\
         {}",
        toml_str
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    info!("Generated config file: {:?}", output);
    println!("Configuration file generated: {}", output.display());

    Ok(())
}

fn validate_config(file: PathBuf) -> Result<()> {
    let config = Config::load(&file)
        .with_context(|| format!("Failed to load config from {:?}", file))?;

    config.validate().context("Configuration validation failed")?;

    let paths = &config.paths;
    println!("✓ Configuration is valid");
    println!("  Input:     {}", paths.input.display());
    println!("  Output:    {}", paths.output.display());
    println!("  Master:    {}", paths.master_file().display());
    println!("  Ledger:    {}", paths.ledger_file().display());
    println!("  Blacklist: {}", paths.blacklist.display());

    Ok(())
}

fn show_paths() -> Result<()> {
    println!("Configuration file search paths:");
    println!();
    for (i, candidate) in CONFIG_CANDIDATES.iter().enumerate() {
        println!("  {}. ./{}", i + 1, candidate);
    }
    println!();
    println!("Override with --config <FILE> or DOMAIN_DEDUP_CONFIG.");

    Ok(())
}
