//! Batch filtering pipeline
//!
//! Classifies every record of one batch, in a fixed order:
//!
//! 1. incomplete records are dropped
//! 2. blacklisted domains are rejected
//! 3. domains already in the registry, or accepted earlier in the same
//!    batch, are rejected as duplicates
//! 4. everything else is accepted
//!
//! A record that is both blacklisted and a duplicate only counts as
//! blacklisted. The pipeline performs no I/O.

mod outcome;

pub use outcome::{Classification, FilterOutcome};

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::filter::BlacklistMatcher;
use crate::record::{BatchId, Record};
use crate::store::MasterDomainRegistry;

/// Blacklist and duplicate filter for a single batch
pub struct BatchFilterPipeline<'a> {
    blacklist: &'a BlacklistMatcher,
    seen: &'a MasterDomainRegistry,
}

impl<'a> BatchFilterPipeline<'a> {
    /// Create a pipeline over the current blacklist and registry state
    pub fn new(blacklist: &'a BlacklistMatcher, seen: &'a MasterDomainRegistry) -> Self {
        Self { blacklist, seen }
    }

    /// Classify one record without considering the rest of its batch
    pub fn classify(&self, batch: &BatchId, record: &Record) -> Classification {
        let Some(domain) = record.domain().filter(|_| record.is_complete()) else {
            return Classification::Incomplete;
        };

        if self.blacklist.is_blacklisted(domain) {
            Classification::Blacklisted
        } else if self.is_seen(batch, domain) {
            Classification::Duplicate
        } else {
            Classification::Accepted
        }
    }

    /// Partition a batch into accepted and rejected records
    ///
    /// Only the first occurrence of a new domain is accepted. A domain the
    /// registry attributes to `batch` itself is not a duplicate: it was
    /// accepted by an earlier, interrupted attempt at this very batch.
    #[instrument(skip(self, records), fields(batch = %batch, rows = records.len()))]
    pub fn filter(&self, batch: &BatchId, records: Vec<Record>) -> FilterOutcome {
        info!("Removing blacklisted and duplicated domains...");

        let mut outcome = FilterOutcome::default();
        let mut accepted_here: HashSet<String> = HashSet::new();

        for record in records {
            let class = match self.classify(batch, &record) {
                Classification::Accepted => {
                    let domain = record.domain().unwrap_or_default();
                    if accepted_here.insert(domain.to_string()) {
                        Classification::Accepted
                    } else {
                        Classification::Duplicate
                    }
                }
                other => other,
            };

            if class == Classification::Duplicate {
                debug!(domain = ?record.domain(), "Duplicate domain found");
            }
            outcome.push(class, record);
        }

        info!(
            blacklisted = outcome.rejected_blacklist.len(),
            duplicates = outcome.rejected_duplicate.len(),
            accepted = outcome.accepted.len(),
            "Batch filtered"
        );

        outcome
    }

    fn is_seen(&self, batch: &BatchId, domain: &str) -> bool {
        self.seen.contains(domain) && self.seen.accepted_by(domain) != Some(batch)
    }
}
