//! Logging initialization

use anyhow::{Context, Result};
use dedup_core::config::LoggingConfig;
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize logging from CLI arguments and the `[logging]` section
///
/// The returned guard flushes the log file on drop and must be held until
/// the program exits.
pub fn init(args: &Args, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // Determine log level
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => config
                .level
                .parse::<Level>()
                .with_context(|| format!("Invalid logging.level: {}", config.level))?,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // Build env filter
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let log_file = args.log_file.as_deref().or(config.file.as_deref());
    let (file_writer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    // Set up subscriber based on format
    match args.log_format {
        LogFormat::Text => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .with_target(args.verbose >= 2)
                    .with_thread_ids(args.verbose >= 3)
                    .with_file(args.verbose >= 3)
                    .with_line_number(args.verbose >= 3),
            );
            let file_layer = file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w));
            subscriber.with(file_layer).init();
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json());
            let file_layer = file_writer.map(|w| fmt::layer().json().with_writer(w));
            subscriber.with(file_layer).init();
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact());
            let file_layer =
                file_writer.map(|w| fmt::layer().compact().with_ansi(false).with_writer(w));
            subscriber.with(file_layer).init();
        }
    }

    Ok(guard)
}

fn file_appender(path: &Path) -> Result<tracing_appender::rolling::RollingFileAppender> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    Ok(tracing_appender::rolling::never(dir, name))
}
