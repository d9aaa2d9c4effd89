//! Batch file discovery

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

const BATCH_EXTENSION: &str = ".xlsx";
const LOCK_FILE_PREFIX: &str = "~$";

/// List the batch files in a directory, sorted by file name
///
/// Only regular files ending in `.xlsx` are returned. Office lock files
/// (`~$name.xlsx`) are skipped.
pub fn discover_batches(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::config_value("paths.input", format!("cannot list {}: {e}", dir.display()))
    })?;

    let mut batches = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!(name = ?entry.file_name(), "Skipping non UTF-8 file name");
            continue;
        };

        if !name.ends_with(BATCH_EXTENSION) || name.starts_with(LOCK_FILE_PREFIX) {
            continue;
        }
        if !entry.file_type()?.is_file() {
            continue;
        }

        batches.push(entry.path());
    }

    batches.sort();
    info!("Input excel files found: {}", batches.len());

    Ok(batches)
}
