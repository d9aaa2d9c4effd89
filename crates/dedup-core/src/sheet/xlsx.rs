//! `.xlsx` reader and writer

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ReadStats, Sheet, SpreadsheetReader, SpreadsheetWriter};
use crate::error::{Error, Result};
use crate::record::{Record, DOMAIN_FIELD};

/// Reads the first worksheet of a workbook
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxReader;

/// Writes a single-worksheet workbook
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl SpreadsheetReader for XlsxReader {
    fn read(&self, path: &Path) -> Result<Sheet> {
        info!("Reading excel file >>> {}", path.display());

        let (columns, rows) = read_rows(path)?;
        if !rows.is_empty() && !columns.iter().any(|c| c == DOMAIN_FIELD) {
            return Err(Error::MissingColumn {
                path: path.to_path_buf(),
                column: DOMAIN_FIELD.to_string(),
            });
        }

        info!(rows = rows.len(), "Rows found, processing...");

        let mut stats = ReadStats {
            rows: rows.len(),
            ..ReadStats::default()
        };
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(rows.len());
        let mut records: Vec<Record> = Vec::with_capacity(rows.len());

        for row in rows {
            if row.iter().any(|cell| cell.is_empty()) {
                stats.incomplete += 1;
                continue;
            }
            if !seen.insert(row.clone()) {
                stats.duplicates += 1;
                continue;
            }
            records.push(columns.iter().cloned().zip(row).collect());
        }

        debug!(
            incomplete = stats.incomplete,
            duplicates = stats.duplicates,
            kept = records.len(),
            "Dropped incomplete and duplicate rows"
        );

        Ok(Sheet {
            columns,
            records,
            stats,
        })
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, path: &Path, columns: &[String], records: &[Record]) -> Result<()> {
        let rows: Vec<Vec<&str>> = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).unwrap_or_default())
                    .collect()
            })
            .collect();

        write_rows(path, columns, &rows)
    }
}

/// Read the header and data rows of the first worksheet
///
/// Cells are trimmed; an empty or whitespace-only cell reads as `""`.
/// An empty worksheet yields no columns and no rows.
pub fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::batch_read(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::batch_read(path, "workbook has no worksheets"))?
        .map_err(|e| Error::batch_read(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_text(cell);
            if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            }
        })
        .collect();

    let data = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok((columns, data))
}

/// Write a header and rows as the only worksheet of a new workbook
///
/// The workbook is saved next to `path` first and renamed into place, so an
/// interrupted write never leaves a truncated file behind.
pub fn write_rows<S: AsRef<str>>(path: &Path, columns: &[String], rows: &[Vec<S>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        let col = column_index(path, col)?;
        worksheet
            .write_string(0, col, name)
            .map_err(|e| Error::persistence(path, e))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_idx = u32::try_from(i + 1).map_err(|e| Error::persistence(path, e))?;
        for (col, value) in row.iter().enumerate() {
            let col = column_index(path, col)?;
            worksheet
                .write_string(row_idx, col, value.as_ref())
                .map_err(|e| Error::persistence(path, e))?;
        }
    }

    let staging = staging_path(path);
    workbook
        .save(&staging)
        .map_err(|e| Error::persistence(path, e))?;
    std::fs::rename(&staging, path).map_err(|e| Error::persistence(path, e))?;

    Ok(())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn column_index(path: &Path, col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|e| Error::persistence(path, e))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_write_then_read_drops_incomplete_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACME_1.xlsx");
        let rows = vec![
            vec!["x.bad.com", "Bad Co"],
            vec!["ok.com", "Ok Inc"],
            vec!["ok.com", "Ok Inc"],
            vec!["blank.com", ""],
        ];
        write_rows(&path, &columns(&["Domain", "Company"]), &rows).unwrap();

        let sheet = XlsxReader.read(&path).unwrap();
        assert_eq!(sheet.columns, ["Domain", "Company"]);
        assert_eq!(sheet.stats.rows, 4);
        assert_eq!(sheet.stats.incomplete, 1);
        assert_eq!(sheet.stats.duplicates, 1);

        let domains: Vec<_> = sheet.records.iter().filter_map(Record::domain).collect();
        assert_eq!(domains, ["x.bad.com", "ok.com"]);
    }

    #[test]
    fn test_same_domain_different_row_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACME_1.xlsx");
        let rows = vec![vec!["ok.com", "Ok Inc"], vec!["ok.com", "Ok Ltd"]];
        write_rows(&path, &columns(&["Domain", "Company"]), &rows).unwrap();

        let sheet = XlsxReader.read(&path).unwrap();
        assert_eq!(sheet.records.len(), 2);
    }

    #[test]
    fn test_missing_domain_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACME_1.xlsx");
        write_rows(&path, &columns(&["Website"]), &[vec!["ok.com"]]).unwrap();

        let err = XlsxReader.read(&path).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }

    #[test]
    fn test_writer_overwrites_and_keeps_header_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let cols = columns(&["Domain", "Company"]);

        let record = Record::new().with("Domain", "ok.com").with("Company", "Ok Inc");
        XlsxWriter.write(&path, &cols, &[record]).unwrap();
        XlsxWriter.write(&path, &cols, &[]).unwrap();

        let (header, rows) = read_rows(&path).unwrap();
        assert_eq!(header, cols);
        assert!(rows.is_empty());
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        assert!(matches!(read_rows(&path), Err(Error::BatchRead { .. })));
    }
}
