//! Filter results

use crate::record::Record;

/// How a single record was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Missing domain or blank field
    Incomplete,
    /// Domain ends with a blacklisted suffix
    Blacklisted,
    /// Domain was accepted before
    Duplicate,
    /// Domain passes both checks
    Accepted,
}

/// Partitioned records of one batch
#[derive(Debug, Default, Clone)]
pub struct FilterOutcome {
    /// Records to write to the batch output
    pub accepted: Vec<Record>,
    /// Records whose domain is blacklisted
    pub rejected_blacklist: Vec<Record>,
    /// Records whose domain was already accepted
    pub rejected_duplicate: Vec<Record>,
    /// Records dropped before classification
    pub incomplete: usize,
}

impl FilterOutcome {
    /// File a record under its classification
    pub fn push(&mut self, class: Classification, record: Record) {
        match class {
            Classification::Incomplete => self.incomplete += 1,
            Classification::Blacklisted => self.rejected_blacklist.push(record),
            Classification::Duplicate => self.rejected_duplicate.push(record),
            Classification::Accepted => self.accepted.push(record),
        }
    }

    /// Domains of the accepted records, in batch order
    pub fn accepted_domains(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().filter_map(Record::domain)
    }

    /// Blacklisted plus duplicate records
    pub fn rejected(&self) -> usize {
        self.rejected_blacklist.len() + self.rejected_duplicate.len()
    }
}
