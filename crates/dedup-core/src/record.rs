//! Record and batch identifier types

use indexmap::IndexMap;
use std::fmt;

use crate::error::{Error, Result};

/// Name of the column holding the matching key
pub const DOMAIN_FIELD: &str = "Domain";

/// Suffix appended to a batch identifier to name its output file
pub const OUTPUT_SUFFIX: &str = " - Duplicates Checked.xlsx";

/// One row of a batch, keyed by column name in sheet order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, keeping its original position if it already exists
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Record::insert`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of a named field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The domain this record is matched on
    pub fn domain(&self) -> Option<&str> {
        self.get(DOMAIN_FIELD)
    }

    /// True when a domain is present and no field is blank
    pub fn is_complete(&self) -> bool {
        self.domain().is_some() && self.fields.values().all(|v| !v.trim().is_empty())
    }

    /// Field names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Field values in column order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Identifier of a logical batch
///
/// Derived from the batch file name: everything before the first `_`.
/// Files sharing the prefix are the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(String);

impl BatchId {
    /// Derive the identifier from a file name
    pub fn from_file_name(name: &str) -> Result<Self> {
        let token = name.split('_').next().unwrap_or_default().trim();
        if token.is_empty() {
            return Err(Error::InvalidBatchName {
                name: name.to_string(),
            });
        }
        Ok(Self(token.to_string()))
    }

    /// Wrap an identifier read back from storage
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this batch's output sheet
    pub fn output_file_name(&self) -> String {
        format!("{}{}", self.0, OUTPUT_SUFFIX)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
