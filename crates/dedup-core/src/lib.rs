//! # Domain Dedup Core
//!
//! Incremental deduplication of spreadsheet domain batches.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Blacklist matching** - Suffix-based domain rejection
//! - **Persistent stores** - Master domain registry and processed batch ledger
//! - **Filter pipeline** - Per-batch blacklist and duplicate classification
//! - **Processor** - The batch state machine tying it all together
//! - **Configuration** - TOML-based path configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use dedup_core::{Config, IncrementalProcessor};
//!
//! let config = Config::load("settings/settings.toml")?;
//! let mut processor = IncrementalProcessor::open(config)?;
//!
//! let summary = processor.run()?;
//! println!("processed {} batches", summary.processed());
//! # Ok::<(), dedup_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod processor;
pub mod record;
pub mod sheet;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use filter::BlacklistMatcher;
pub use pipeline::{BatchFilterPipeline, FilterOutcome};
pub use processor::{BatchReport, IncrementalProcessor, RunSummary};
pub use record::{BatchId, Record, DOMAIN_FIELD};
pub use store::{MasterDomainRegistry, ProcessedBatchLedger};
