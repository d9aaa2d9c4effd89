//! Run command - process new batches

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dedup_core::processor::BatchStatus;
use dedup_core::{Config, IncrementalProcessor, RunSummary};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Run command arguments
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub paths: PathOverrides,

    /// List the batches that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Command-line overrides for `[paths]`
#[derive(Args, Debug, Default, Clone)]
pub struct PathOverrides {
    /// Input directory
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory holding master.xlsx
    #[arg(long, value_name = "DIR")]
    pub master: Option<PathBuf>,

    /// Directory holding processed_files.txt
    #[arg(long, value_name = "DIR")]
    pub processed_files: Option<PathBuf>,

    /// Blacklist file
    #[arg(short = 'b', long, value_name = "FILE")]
    pub blacklist: Option<PathBuf>,
}

impl PathOverrides {
    /// Apply the given overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        let paths = &mut config.paths;
        let overrides = [
            (&self.input, &mut paths.input),
            (&self.output, &mut paths.output),
            (&self.master, &mut paths.master),
            (&self.processed_files, &mut paths.processed_files),
            (&self.blacklist, &mut paths.blacklist),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

/// Execute the run command
pub fn execute(args: RunArgs, mut config: Config) -> Result<()> {
    args.paths.apply(&mut config);
    info!(input = %config.paths.input.display(), "Starting run");

    let mut processor =
        IncrementalProcessor::open(config).context("Failed to initialize processor")?;

    if args.dry_run {
        warn!("Dry run mode - nothing will be written");
        let pending = processor.pending().context("Failed to list batches")?;
        println!("{} batch(es) pending:", pending.len());
        for path in pending {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    // Set up signal handler
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt signal, finishing current batch...");
        s.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let summary = processor.run_until(&stop).context("Run aborted")?;
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    for report in &summary.batches {
        match report.status {
            BatchStatus::Skipped => {
                println!("  {} {} (already processed)", "skip".yellow(), report.batch);
            }
            BatchStatus::Processed => {
                println!(
                    "  {} {}: {} accepted, {} blacklisted, {} duplicates, {} incomplete",
                    "done".green(),
                    report.batch,
                    report.accepted,
                    report.blacklisted,
                    report.duplicates,
                    report.read.incomplete,
                );
            }
        }
    }
    for path in &summary.unnamed {
        println!("  {} {} (no batch identifier)", "skip".red(), path.display());
    }

    println!();
    println!(
        "{} Processed files: {} || Rejected files: {}",
        "✓".green().bold(),
        summary.processed(),
        summary.rejected()
    );
    if summary.interrupted {
        println!("{}", "Interrupted - remaining batches will run next time".yellow());
    }
}
