//! Blacklist matcher implementation

use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Static list of blacklisted domain suffixes
#[derive(Debug, Clone, Default)]
pub struct BlacklistMatcher {
    /// Suffixes, trimmed, in file order
    suffixes: Vec<String>,
}

impl BlacklistMatcher {
    /// Create a matcher that rejects nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create matcher from in-memory entries
    ///
    /// Entries are trimmed; blank entries and `#` comments are ignored.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref().trim();
                if entry.is_empty() || entry.starts_with('#') {
                    None
                } else {
                    Some(entry.to_string())
                }
            })
            .collect();

        Self { suffixes }
    }

    /// Load the blacklist from a newline-delimited file
    ///
    /// An unreadable file is a startup failure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Retrieving blacklisted domains...");

        let content = std::fs::read_to_string(path).map_err(|source| Error::Blacklist {
            path: path.to_path_buf(),
            source,
        })?;
        let matcher = Self::with_entries(content.lines());

        info!(count = matcher.len(), path = %path.display(), "Blacklisted domains found");
        Ok(matcher)
    }

    /// Check whether a domain ends with any blacklisted suffix
    pub fn is_blacklisted(&self, domain: &str) -> bool {
        match self.suffixes.iter().find(|suffix| domain.ends_with(suffix.as_str())) {
            Some(suffix) => {
                debug!(domain, suffix = suffix.as_str(), "Blacklisted domain found");
                true
            }
            None => false,
        }
    }

    /// Number of suffixes
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    /// Check if the blacklist is empty
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// The loaded suffixes
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_match() {
        let matcher = BlacklistMatcher::with_entries(["bad.com"]);

        assert!(matcher.is_blacklisted("bad.com"));
        assert!(matcher.is_blacklisted("x.bad.com"));
        // Not on a label boundary, still a suffix
        assert!(matcher.is_blacklisted("notbad.com"));
        assert!(!matcher.is_blacklisted("bad.com.tr"));
        assert!(!matcher.is_blacklisted("ok.com"));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = BlacklistMatcher::with_entries(["bad.com"]);
        assert!(!matcher.is_blacklisted("X.BAD.COM"));
    }

    #[test]
    fn test_empty_blacklist_passes_everything() {
        let matcher = BlacklistMatcher::new();
        assert!(matcher.is_empty());
        assert!(!matcher.is_blacklisted("anything.example"));
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let matcher = BlacklistMatcher::with_entries(["", "  ", "# comment", " gov.tr  "]);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.suffixes(), ["gov.tr"]);
        assert!(matcher.is_blacklisted("ankara.gov.tr"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blacklisted.txt");
        std::fs::write(&path, "bad.com\n\n  evil.org \n").unwrap();

        let matcher = BlacklistMatcher::from_file(&path).unwrap();
        assert_eq!(matcher.len(), 2);
        assert!(matcher.is_blacklisted("www.evil.org"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlacklistMatcher::from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, Error::Blacklist { .. }));
        assert!(err.is_startup());
    }
}
