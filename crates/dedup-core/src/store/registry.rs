//! Master domain registry

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{BATCH_COLUMN, PROCESSED_COLUMN};
use crate::error::{Error, Result};
use crate::record::BatchId;
use crate::sheet::{read_rows, write_rows};

/// One accepted domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The accepted domain
    pub domain: String,
    /// Batch that accepted it, unknown for legacy rows
    pub batch: Option<BatchId>,
}

/// Append-only set of every domain accepted by any run
///
/// The full set lives in memory. Every [`append`](Self::append) rewrites the
/// whole master sheet (existing entries followed by the new ones).
#[derive(Debug)]
pub struct MasterDomainRegistry {
    path: PathBuf,
    /// Entries in persisted order
    entries: Vec<RegistryEntry>,
    /// Domain -> position in `entries`
    index: HashMap<String, usize>,
}

impl MasterDomainRegistry {
    /// Create an empty registry that will persist to `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load the registry stored at `path`
    ///
    /// A missing file is a first run and yields an empty registry. Repeated
    /// domains in a legacy sheet collapse to their first row.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let mut registry = Self::new(path);
        if !registry.path.is_file() {
            return Ok(registry);
        }

        info!("Retrieving processed domains...");

        let (columns, rows) = read_rows(&registry.path)?;
        let position = |name: &str| columns.iter().position(|c| c == name);

        let Some(domain_col) = position(PROCESSED_COLUMN) else {
            if rows.is_empty() {
                return Ok(registry);
            }
            return Err(Error::MissingColumn {
                path: registry.path.clone(),
                column: PROCESSED_COLUMN.to_string(),
            });
        };
        let batch_col = position(BATCH_COLUMN);

        let mut repeated = 0usize;
        for row in rows {
            let domain = row[domain_col].clone();
            if domain.is_empty() {
                continue;
            }
            let batch = batch_col
                .map(|col| row[col].as_str())
                .filter(|id| !id.is_empty())
                .map(BatchId::new);

            if !registry.insert(RegistryEntry { domain, batch }) {
                repeated += 1;
            }
        }

        if repeated > 0 {
            warn!(repeated, "Master sheet lists some domains more than once");
        }
        info!("Processed domains found: {}", registry.len());

        Ok(registry)
    }

    /// Check whether a domain was accepted in this or any earlier run
    pub fn contains(&self, domain: &str) -> bool {
        self.index.contains_key(domain)
    }

    /// Batch that accepted a domain, if recorded
    pub fn accepted_by(&self, domain: &str) -> Option<&BatchId> {
        self.index
            .get(domain)
            .and_then(|&i| self.entries[i].batch.as_ref())
    }

    /// Add domains accepted by `batch` and rewrite the master sheet
    ///
    /// Domains that are already members are not written again. The sheet is
    /// rewritten even when nothing is new so it always exists after a batch.
    /// In-memory state only changes once the write succeeded. Returns the
    /// number of domains added.
    pub fn append<I, S>(&mut self, domains: I, batch: &BatchId) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fresh: Vec<RegistryEntry> = Vec::new();
        for domain in domains {
            let domain = domain.as_ref();
            if self.contains(domain) || fresh.iter().any(|e| e.domain == domain) {
                continue;
            }
            fresh.push(RegistryEntry {
                domain: domain.to_string(),
                batch: Some(batch.clone()),
            });
        }

        self.persist(&fresh)?;

        let added = fresh.len();
        for entry in fresh {
            self.insert(entry);
        }

        info!("{} domains saved to master excel", added);
        Ok(added)
    }

    /// Number of distinct domains
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no domain was ever accepted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in persisted order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Location of the master sheet
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn insert(&mut self, entry: RegistryEntry) -> bool {
        if self.index.contains_key(&entry.domain) {
            return false;
        }
        self.index.insert(entry.domain.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    fn persist(&self, fresh: &[RegistryEntry]) -> Result<()> {
        info!("Saving processed domains to master excel...");

        let columns = [PROCESSED_COLUMN.to_string(), BATCH_COLUMN.to_string()];
        let rows: Vec<Vec<&str>> = self
            .entries
            .iter()
            .chain(fresh)
            .map(|e| vec![e.domain.as_str(), e.batch.as_ref().map_or("", BatchId::as_str)])
            .collect();

        write_rows(&self.path, &columns, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: &str) -> BatchId {
        BatchId::new(id)
    }

    #[test]
    fn test_missing_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = MasterDomainRegistry::open(dir.path().join("master.xlsx")).unwrap();
        assert!(registry.is_empty());
        assert!(!registry.contains("ok.com"));
    }

    #[test]
    fn test_append_persists_full_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.xlsx");

        let mut registry = MasterDomainRegistry::open(&path).unwrap();
        assert_eq!(registry.append(["a.com", "b.com"], &batch("A")).unwrap(), 2);
        assert_eq!(registry.append(["c.com"], &batch("B")).unwrap(), 1);

        let reloaded = MasterDomainRegistry::open(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        for domain in ["a.com", "b.com", "c.com"] {
            assert!(reloaded.contains(domain), "{domain} lost");
        }
        assert_eq!(reloaded.accepted_by("a.com"), Some(&batch("A")));
        assert_eq!(reloaded.accepted_by("c.com"), Some(&batch("B")));
    }

    #[test]
    fn test_append_never_stores_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.xlsx");

        let mut registry = MasterDomainRegistry::open(&path).unwrap();
        registry.append(["a.com", "a.com"], &batch("A")).unwrap();
        assert_eq!(registry.append(["a.com"], &batch("B")).unwrap(), 0);

        let (_, rows) = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        // First acceptance wins
        assert_eq!(registry.accepted_by("a.com"), Some(&batch("A")));
    }

    #[test]
    fn test_legacy_sheet_without_batch_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.xlsx");
        let rows = vec![vec!["old.com"], vec!["old.com"], vec!["older.com"]];
        write_rows(&path, &[PROCESSED_COLUMN.to_string()], &rows).unwrap();

        let mut registry = MasterDomainRegistry::open(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("old.com"));
        assert_eq!(registry.accepted_by("old.com"), None);

        registry.append(["new.com"], &batch("N")).unwrap();
        let (columns, rows) = read_rows(&path).unwrap();
        assert_eq!(columns, [PROCESSED_COLUMN, BATCH_COLUMN]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_sheet_without_processed_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.xlsx");
        write_rows(&path, &["Domain".to_string()], &[vec!["a.com"]]).unwrap();

        assert!(matches!(
            MasterDomainRegistry::open(&path),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("master.xlsx");

        let mut registry = MasterDomainRegistry::new(&path);
        let err = registry.append(["a.com"], &batch("A")).unwrap_err();
        assert!(matches!(err, Error::PersistenceWrite { .. }));
        assert!(!registry.contains("a.com"));
    }
}
