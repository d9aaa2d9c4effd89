//! Per-batch and per-run reporting

use std::path::PathBuf;

use crate::pipeline::FilterOutcome;
use crate::record::BatchId;
use crate::sheet::ReadStats;

/// What happened to a discovered batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Went through the full chain and is now in the ledger
    Processed,
    /// Already in the ledger, left untouched
    Skipped,
}

/// Report for a single batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Batch identifier
    pub batch: BatchId,
    /// Source file
    pub source: PathBuf,
    /// Final status
    pub status: BatchStatus,
    /// Reader counters
    pub read: ReadStats,
    /// Records written to the output sheet
    pub accepted: usize,
    /// Records rejected by the blacklist
    pub blacklisted: usize,
    /// Records rejected as already accepted
    pub duplicates: usize,
    /// Domains newly added to the master registry
    pub registered: usize,
    /// Output sheet, when processed
    pub output: Option<PathBuf>,
}

impl BatchReport {
    pub(crate) fn skipped(batch: BatchId, source: PathBuf) -> Self {
        Self {
            batch,
            source,
            status: BatchStatus::Skipped,
            read: ReadStats::default(),
            accepted: 0,
            blacklisted: 0,
            duplicates: 0,
            registered: 0,
            output: None,
        }
    }

    pub(crate) fn processed(
        batch: BatchId,
        source: PathBuf,
        read: ReadStats,
        outcome: &FilterOutcome,
        registered: usize,
        output: PathBuf,
    ) -> Self {
        Self {
            batch,
            source,
            status: BatchStatus::Processed,
            read,
            accepted: outcome.accepted.len(),
            blacklisted: outcome.rejected_blacklist.len(),
            duplicates: outcome.rejected_duplicate.len(),
            registered,
            output: Some(output),
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Reports in discovery order
    pub batches: Vec<BatchReport>,
    /// Files whose name yields no batch identifier
    pub unnamed: Vec<PathBuf>,
    /// A stop was requested before every batch was visited
    pub interrupted: bool,
}

impl RunSummary {
    /// Batches that went through the full chain
    pub fn processed(&self) -> usize {
        self.count(BatchStatus::Processed)
    }

    /// Batches skipped because the ledger already had them
    pub fn skipped(&self) -> usize {
        self.count(BatchStatus::Skipped)
    }

    /// Files not processed: skipped batches plus unnamed files
    pub fn rejected(&self) -> usize {
        self.skipped() + self.unnamed.len()
    }

    /// Total accepted records
    pub fn accepted(&self) -> usize {
        self.batches.iter().map(|b| b.accepted).sum()
    }

    /// Total blacklisted records
    pub fn blacklisted(&self) -> usize {
        self.batches.iter().map(|b| b.blacklisted).sum()
    }

    /// Total duplicate records
    pub fn duplicates(&self) -> usize {
        self.batches.iter().map(|b| b.duplicates).sum()
    }

    fn count(&self, status: BatchStatus) -> usize {
        self.batches.iter().filter(|b| b.status == status).count()
    }
}
