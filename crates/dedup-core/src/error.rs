//! Error types for the deduplication core
//!
//! Every failure here is fatal to the run. Blacklist and duplicate
//! rejections are classification outcomes and never surface as errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Blacklist source could not be read
    #[error("Blacklist file error for '{path}': {source}")]
    Blacklist {
        /// Path to the blacklist file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A batch file could not be read or parsed
    #[error("Failed to read batch '{path}': {message}")]
    BatchRead {
        /// Path to the batch file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A sheet lacks a required column
    #[error("Sheet '{path}' has no '{column}' column")]
    MissingColumn {
        /// Path to the sheet
        path: PathBuf,
        /// Name of the missing column
        column: String,
    },

    /// A batch file name yields no identifier
    #[error("Cannot derive a batch identifier from file name '{name}'")]
    InvalidBatchName {
        /// Offending file name
        name: String,
    },

    /// Output, registry or ledger write failed
    #[error("Failed to write '{path}': {message}")]
    PersistenceWrite {
        /// Path being written
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a batch read error
    pub fn batch_read(path: &Path, message: impl ToString) -> Self {
        Self::BatchRead {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create a persistence write error
    pub fn persistence(path: &Path, message: impl ToString) -> Self {
        Self::PersistenceWrite {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Whether this error happened before any batch could be touched
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ConfigNotFound { .. }
                | Self::ConfigValue { .. }
                | Self::Blacklist { .. }
                | Self::TomlParse(_)
        )
    }
}
