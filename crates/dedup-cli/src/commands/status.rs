//! Status command - show persisted state

use anyhow::{Context, Result};
use clap::Args;
use dedup_core::{Config, IncrementalProcessor};

use super::run::PathOverrides;

/// Status command arguments
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub paths: PathOverrides,
}

/// Execute the status command
pub fn execute(args: StatusArgs, mut config: Config) -> Result<()> {
    args.paths.apply(&mut config);

    let processor =
        IncrementalProcessor::open(config).context("Failed to initialize processor")?;
    let pending = processor.pending().context("Failed to list batches")?;

    println!("Blacklisted suffixes: {}", processor.blacklist().len());
    println!(
        "Accepted domains:     {} ({})",
        processor.registry().len(),
        processor.registry().path().display()
    );
    println!(
        "Processed batches:    {} ({})",
        processor.ledger().len(),
        processor.ledger().path().display()
    );
    println!("Pending batches:      {}", pending.len());
    for path in pending {
        println!("  {}", path.display());
    }

    Ok(())
}
