//! Incremental batch processor
//!
//! Drives every discovered batch through
//! `Discovered -> Loaded -> Filtered -> OutputWritten -> RegistryUpdated ->
//! LedgerUpdated`, or straight to skipped when the ledger already holds its
//! identifier. The ledger write is always the last durable step of a batch,
//! so an interrupted batch is simply processed again on the next run.

mod summary;

pub use summary::{BatchReport, BatchStatus, RunSummary};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, info_span, warn};

use crate::config::{Config, PathsConfig};
use crate::error::{Error, Result};
use crate::filter::BlacklistMatcher;
use crate::pipeline::BatchFilterPipeline;
use crate::record::BatchId;
use crate::sheet::{
    discover_batches, SpreadsheetReader, SpreadsheetWriter, XlsxReader, XlsxWriter,
};
use crate::store::{MasterDomainRegistry, ProcessedBatchLedger};

/// Owner of the run state: blacklist, registry and ledger
pub struct IncrementalProcessor {
    paths: PathsConfig,
    blacklist: BlacklistMatcher,
    registry: MasterDomainRegistry,
    ledger: ProcessedBatchLedger,
    reader: Box<dyn SpreadsheetReader>,
    writer: Box<dyn SpreadsheetWriter>,
}

impl IncrementalProcessor {
    /// Open a processor with the `.xlsx` reader and writer
    pub fn open(config: Config) -> Result<Self> {
        Self::with_io(config, Box::new(XlsxReader), Box::new(XlsxWriter))
    }

    /// Open a processor with custom spreadsheet I/O
    ///
    /// Validates the configuration, then loads the blacklist, registry and
    /// ledger. Nothing is written to disk, so an opened processor can also
    /// serve read-only queries such as [`pending`](Self::pending).
    pub fn with_io(
        config: Config,
        reader: Box<dyn SpreadsheetReader>,
        writer: Box<dyn SpreadsheetWriter>,
    ) -> Result<Self> {
        config.validate()?;
        let paths = config.paths;

        let blacklist = BlacklistMatcher::from_file(&paths.blacklist)?;
        let registry = MasterDomainRegistry::open(paths.master_file())?;
        let ledger = ProcessedBatchLedger::open(paths.ledger_file())?;

        Ok(Self {
            paths,
            blacklist,
            registry,
            ledger,
            reader,
            writer,
        })
    }

    /// Process every discovered batch
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Process discovered batches until done or `stop` is raised
    ///
    /// `stop` is only checked between batches. The first error aborts the
    /// run; batches completed before it stay completed. Files whose name
    /// yields no identifier are rejected with a warning and never block the
    /// batches after them.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<RunSummary> {
        info!("*****Processor Started*****");

        self.create_dirs()?;
        let batches = discover_batches(&self.paths.input)?;
        let mut summary = RunSummary::default();

        for path in batches {
            if stop.load(Ordering::SeqCst) {
                warn!("Stop requested, leaving remaining batches for the next run");
                summary.interrupted = true;
                break;
            }
            if batch_id(&path).is_err() {
                warn!("Rejecting file without a batch identifier >> {}", path.display());
                summary.unnamed.push(path);
                continue;
            }
            summary.batches.push(self.process_batch(&path)?);
        }

        info!("Done processing.");
        info!(
            "Processed files: {} || Rejected files: {}",
            summary.processed(),
            summary.rejected()
        );

        Ok(summary)
    }

    fn create_dirs(&self) -> Result<()> {
        for (key, dir) in [
            ("paths.output", &self.paths.output),
            ("paths.master", &self.paths.master),
            ("paths.processed_files", &self.paths.processed_files),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::config_value(key, format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// Take one batch file through the full state machine
    ///
    /// The output and state directories must exist; [`run_until`](Self::run_until)
    /// creates them.
    pub fn process_batch(&mut self, path: &Path) -> Result<BatchReport> {
        let batch = batch_id(path)?;
        let name = path.file_name().unwrap_or_default().to_string_lossy();

        let span = info_span!("batch", id = %batch);
        let _guard = span.enter();

        if self.ledger.contains(&batch) {
            info!("Skipping processed file >> {}", name);
            return Ok(BatchReport::skipped(batch, path.to_path_buf()));
        }

        // Loaded
        let sheet = self.reader.read(path)?;

        // Filtered
        let outcome =
            BatchFilterPipeline::new(&self.blacklist, &self.registry).filter(&batch, sheet.records);

        // OutputWritten
        info!("Saving data to excel...");
        let output = self.paths.output_file(&batch);
        self.writer.write(&output, &sheet.columns, &outcome.accepted)?;
        info!("Records saved to >> {}", output.display());

        // RegistryUpdated
        let registered = self.registry.append(outcome.accepted_domains(), &batch)?;

        // LedgerUpdated
        self.ledger.append(&batch)?;

        Ok(BatchReport::processed(
            batch,
            path.to_path_buf(),
            sheet.stats,
            &outcome,
            registered,
            output,
        ))
    }

    /// Batch files the next run would process
    ///
    /// One file per identifier not yet in the ledger, the first in discovery
    /// order. Files without an identifier are left out.
    pub fn pending(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for path in discover_batches(&self.paths.input)? {
            let Ok(batch) = batch_id(&path) else {
                continue;
            };
            if !self.ledger.contains(&batch) && seen.insert(batch) {
                pending.push(path);
            }
        }
        Ok(pending)
    }

    /// The master registry as loaded and updated by this run
    pub fn registry(&self) -> &MasterDomainRegistry {
        &self.registry
    }

    /// The ledger as loaded and updated by this run
    pub fn ledger(&self) -> &ProcessedBatchLedger {
        &self.ledger
    }

    /// The loaded blacklist
    pub fn blacklist(&self) -> &BlacklistMatcher {
        &self.blacklist
    }

    /// Configured locations
    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }
}

fn batch_id(path: &Path) -> Result<BatchId> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidBatchName {
            name: path.display().to_string(),
        })?;
    BatchId::from_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::sheet::{MockSpreadsheetReader, MockSpreadsheetWriter, ReadStats, Sheet};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, blacklist: &str) -> Config {
        let root = dir.path();
        std::fs::create_dir_all(root.join("input")).unwrap();
        std::fs::write(root.join("blacklisted.txt"), blacklist).unwrap();

        let mut config = Config::default();
        config.paths = PathsConfig {
            input: root.join("input"),
            output: root.join("output"),
            master: root.join("master"),
            processed_files: root.join("state"),
            blacklist: root.join("blacklisted.txt"),
        };
        config
    }

    fn touch_batch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join("input").join(name), b"").unwrap();
    }

    fn sheet(domains: &[&str]) -> Sheet {
        Sheet {
            columns: vec!["Domain".to_string()],
            records: domains.iter().map(|d| Record::new().with("Domain", *d)).collect(),
            stats: ReadStats {
                rows: domains.len(),
                ..ReadStats::default()
            },
        }
    }

    #[test]
    fn test_failed_output_write_leaves_batch_pending() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "bad.com\n");
        touch_batch(&dir, "ACME_1.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader
            .expect_read()
            .times(1)
            .returning(|_| Ok(sheet(&["ok.com"])));
        let mut writer = MockSpreadsheetWriter::new();
        writer
            .expect_write()
            .times(1)
            .returning(|path, _, _| Err(Error::persistence(path, "disk full")));

        let mut processor =
            IncrementalProcessor::with_io(config.clone(), Box::new(reader), Box::new(writer))
                .unwrap();
        let err = processor.run().unwrap_err();
        assert!(matches!(err, Error::PersistenceWrite { .. }));

        assert!(!processor.registry().contains("ok.com"));
        assert!(!processor.ledger().contains(&BatchId::new("ACME")));
        assert!(!config.paths.ledger_file().exists());
        assert_eq!(processor.pending().unwrap().len(), 1);
    }

    #[test]
    fn test_read_error_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "ACME_1.xlsx");
        touch_batch(&dir, "GLOBEX_1.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader
            .expect_read()
            .times(1)
            .returning(|path| Err(Error::batch_read(path, "corrupt")));
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_write().never();

        let mut processor =
            IncrementalProcessor::with_io(config, Box::new(reader), Box::new(writer)).unwrap();
        assert!(matches!(processor.run(), Err(Error::BatchRead { .. })));
        assert!(processor.ledger().is_empty());
    }

    #[test]
    fn test_shared_identifier_processed_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "ACME_jan.xlsx");
        touch_batch(&dir, "ACME_feb.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader
            .expect_read()
            .times(1)
            .returning(|_| Ok(sheet(&["a.com", "b.com"])));
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_write().times(1).returning(|_, _, _| Ok(()));

        let mut processor =
            IncrementalProcessor::with_io(config, Box::new(reader), Box::new(writer)).unwrap();
        let summary = processor.run().unwrap();

        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.batches[0].registered, 2);
    }

    #[test]
    fn test_later_batch_sees_earlier_acceptances() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "A_1.xlsx");
        touch_batch(&dir, "B_1.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader.expect_read().returning(|path| {
            if path.ends_with("A_1.xlsx") {
                Ok(sheet(&["shared.com", "a.com"]))
            } else {
                Ok(sheet(&["shared.com", "b.com"]))
            }
        });
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_write().times(2).returning(|_, _, _| Ok(()));

        let mut processor =
            IncrementalProcessor::with_io(config, Box::new(reader), Box::new(writer)).unwrap();
        let summary = processor.run().unwrap();

        assert_eq!(summary.batches[0].accepted, 2);
        assert_eq!(summary.batches[1].accepted, 1);
        assert_eq!(summary.batches[1].duplicates, 1);
        assert_eq!(processor.registry().len(), 3);
    }

    #[test]
    fn test_stop_flag_checked_between_batches() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "A_1.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader.expect_read().never();
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_write().never();

        let mut processor =
            IncrementalProcessor::with_io(config, Box::new(reader), Box::new(writer)).unwrap();
        let summary = processor.run_until(&AtomicBool::new(true)).unwrap();

        assert!(summary.interrupted);
        assert!(summary.batches.is_empty());
    }

    #[test]
    fn test_missing_blacklist_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir, "");
        config.paths.blacklist = dir.path().join("absent.txt");

        let err = IncrementalProcessor::with_io(
            config,
            Box::new(MockSpreadsheetReader::new()),
            Box::new(MockSpreadsheetWriter::new()),
        )
        .err()
        .unwrap();
        assert!(err.is_startup());
    }

    #[test]
    fn test_unnamed_file_is_rejected_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "_stray.xlsx");
        touch_batch(&dir, "acme_1.xlsx");

        let mut reader = MockSpreadsheetReader::new();
        reader
            .expect_read()
            .times(1)
            .withf(|path: &Path| path.ends_with("acme_1.xlsx"))
            .returning(|_| Ok(sheet(&["a.com"])));
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_write().times(1).returning(|_, _, _| Ok(()));

        let mut processor =
            IncrementalProcessor::with_io(config, Box::new(reader), Box::new(writer)).unwrap();
        let summary = processor.run().unwrap();

        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.unnamed.len(), 1);
        assert_eq!(summary.rejected(), 1);
        assert!(processor.ledger().contains(&BatchId::new("acme")));
        assert!(processor.pending().unwrap().is_empty());
    }

    #[test]
    fn test_pending_lists_one_file_per_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");
        touch_batch(&dir, "ACME_feb.xlsx");
        touch_batch(&dir, "ACME_jan.xlsx");
        touch_batch(&dir, "GLOBEX_1.xlsx");
        touch_batch(&dir, "_stray.xlsx");

        let processor = IncrementalProcessor::with_io(
            config,
            Box::new(MockSpreadsheetReader::new()),
            Box::new(MockSpreadsheetWriter::new()),
        )
        .unwrap();
        let pending = processor.pending().unwrap();

        assert_eq!(pending.len(), 2);
        assert!(pending[0].ends_with("ACME_feb.xlsx"));
        assert!(pending[1].ends_with("GLOBEX_1.xlsx"));
    }

    #[test]
    fn test_open_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "");

        let processor = IncrementalProcessor::with_io(
            config.clone(),
            Box::new(MockSpreadsheetReader::new()),
            Box::new(MockSpreadsheetWriter::new()),
        )
        .unwrap();
        assert!(processor.pending().unwrap().is_empty());

        assert!(!config.paths.output.exists());
        assert!(!config.paths.master.exists());
        assert!(!config.paths.processed_files.exists());
    }
}
