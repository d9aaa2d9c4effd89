//! Persistent state shared across runs
//!
//! - [`MasterDomainRegistry`] - every domain ever accepted, stored as a
//!   sheet and rewritten in full after each batch
//! - [`ProcessedBatchLedger`] - every batch fully handled, stored as a text
//!   file and appended one line at a time
//!
//! Both are read once when the processor opens and are only mutated by it.

mod ledger;
mod registry;

pub use ledger::ProcessedBatchLedger;
pub use registry::{MasterDomainRegistry, RegistryEntry};

/// File name of the master registry inside the master directory
pub const MASTER_FILE_NAME: &str = "master.xlsx";

/// File name of the ledger inside the processed-files directory
pub const LEDGER_FILE_NAME: &str = "processed_files.txt";

/// Column of the master sheet holding accepted domains
pub const PROCESSED_COLUMN: &str = "processed";

/// Column of the master sheet naming the batch that accepted a domain
pub const BATCH_COLUMN: &str = "batch";
