//! Spreadsheet input and output
//!
//! The processor only talks to the [`SpreadsheetReader`] and
//! [`SpreadsheetWriter`] traits; [`XlsxReader`] and [`XlsxWriter`] are the
//! production implementations.

mod discovery;
mod xlsx;

pub use discovery::discover_batches;
pub use xlsx::{read_rows, write_rows, XlsxReader, XlsxWriter};

use std::path::Path;

use crate::error::Result;
use crate::record::Record;

/// Counters collected while reading a sheet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Data rows found below the header
    pub rows: usize,
    /// Rows dropped for a missing or blank field
    pub incomplete: usize,
    /// Rows dropped as exact copies of an earlier row
    pub duplicates: usize,
}

/// A batch as handed to the core
#[derive(Debug, Default, Clone)]
pub struct Sheet {
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Complete, unique records
    pub records: Vec<Record>,
    /// Read counters
    pub stats: ReadStats,
}

/// Source of batch records
#[cfg_attr(test, mockall::automock)]
pub trait SpreadsheetReader {
    /// Read a batch, dropping incomplete and exact-duplicate rows
    fn read(&self, path: &Path) -> Result<Sheet>;
}

/// Sink for accepted records
#[cfg_attr(test, mockall::automock)]
pub trait SpreadsheetWriter {
    /// Write records under the given columns, replacing any existing file
    fn write(&self, path: &Path, columns: &[String], records: &[Record]) -> Result<()>;
}
