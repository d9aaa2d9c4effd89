//! Domain Dedup CLI
//!
//! Command-line interface for incremental domain deduplication.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Completions never need a config
    if let Some(commands::Command::Completions(ref comp_args)) = args.command {
        return commands::completions::execute(comp_args);
    }

    let config = commands::load_config(args.config.as_deref())?;

    // Initialize logging
    let _log_guard = logging::init(&args, &config.logging)?;

    let runs_batches = matches!(args.command, None | Some(commands::Command::Run(_)));
    if runs_batches && !args.quiet {
        print_banner();
    }

    // Run the main logic
    let result = run(args, config);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args, config: dedup_core::Config) -> Result<()> {
    match args.command {
        Some(commands::Command::Run(run_args)) => commands::run::execute(run_args, config),
        Some(commands::Command::Status(status_args)) => {
            commands::status::execute(status_args, config)
        }
        Some(commands::Command::Config(config_args)) => {
            commands::config::execute(config_args, config)
        }
        Some(commands::Command::Completions(comp_args)) => {
            commands::completions::execute(&comp_args)
        }
        None => commands::run::execute(commands::run::RunArgs::default(), config),
    }
}

fn print_banner() {
    use colored::Colorize;

    println!();
    println!("{}", "╔═══════════════════════════════════════╗".cyan());
    println!(
        "{}{}{}",
        "║  ".cyan(),
        format!("Domain Dedup v{}", env!("CARGO_PKG_VERSION")).green().bold(),
        "                 ║".cyan()
    );
    println!("{}", "╚═══════════════════════════════════════╝".cyan());
    println!();
}
