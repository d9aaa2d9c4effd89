//! Processed batch ledger

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::BatchId;

/// Append-only set of batch identifiers that completed processing
///
/// Backed by a text file with one identifier per line.
#[derive(Debug)]
pub struct ProcessedBatchLedger {
    path: PathBuf,
    ids: HashSet<BatchId>,
    /// The file exists and its last line is unterminated
    needs_newline: bool,
}

impl ProcessedBatchLedger {
    /// Load the ledger stored at `path`
    ///
    /// A missing file yields an empty ledger. Blank lines are ignored.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Ok(Self {
                path,
                ids: HashSet::new(),
                needs_newline: false,
            });
        }

        info!("Reading processed files...");

        let content = std::fs::read_to_string(&path)?;
        let ids: HashSet<BatchId> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(BatchId::new)
            .collect();
        let needs_newline = !content.is_empty() && !content.ends_with('\n');

        info!("Processed files found: {}", ids.len());

        Ok(Self {
            path,
            ids,
            needs_newline,
        })
    }

    /// Check whether a batch already completed
    pub fn contains(&self, id: &BatchId) -> bool {
        self.ids.contains(id)
    }

    /// Record a batch as completed
    ///
    /// The line is synced to disk before this returns. Appending an id that
    /// is already present does nothing.
    pub fn append(&mut self, id: &BatchId) -> Result<()> {
        if self.contains(id) {
            debug!(batch = %id, "Batch already in ledger");
            return Ok(());
        }

        let write = |needs_newline: bool| -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            if needs_newline {
                file.write_all(b"\n")?;
            }
            writeln!(file, "{id}")?;
            file.sync_all()
        };
        write(self.needs_newline).map_err(|e| Error::persistence(&self.path, e))?;

        self.needs_newline = false;
        self.ids.insert(id.clone());
        Ok(())
    }

    /// Number of recorded batches
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no batch was recorded yet
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Location of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
