//! Configuration management
//!
//! Strongly-typed TOML configuration. All directories are read once at
//! startup and handed to the processor explicitly.

use crate::error::{Error, Result};
use crate::record::BatchId;
use crate::store::{LEDGER_FILE_NAME, MASTER_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Input, output and state locations
    pub paths: PathsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let paths = &self.paths;
        let named = [
            ("paths.input", &paths.input),
            ("paths.output", &paths.output),
            ("paths.master", &paths.master),
            ("paths.processed_files", &paths.processed_files),
            ("paths.blacklist", &paths.blacklist),
        ];

        for (key, path) in named {
            if path.as_os_str().is_empty() {
                return Err(Error::config_value(key, "Must not be empty"));
            }
        }

        if paths.input == paths.output {
            return Err(Error::config_value(
                "paths.output",
                "Must differ from paths.input, outputs would be picked up as new batches",
            ));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Directory and file locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for batch files
    pub input: PathBuf,
    /// Directory receiving per-batch outputs
    pub output: PathBuf,
    /// Directory holding the master registry sheet
    pub master: PathBuf,
    /// Directory holding the processed batch ledger
    pub processed_files: PathBuf,
    /// Blacklisted suffixes, one per line
    pub blacklist: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input"),
            output: PathBuf::from("output"),
            master: PathBuf::from("master"),
            processed_files: PathBuf::from("master"),
            blacklist: PathBuf::from("settings/blacklisted.txt"),
        }
    }
}

impl PathsConfig {
    /// Full path of the master registry sheet
    pub fn master_file(&self) -> PathBuf {
        self.master.join(MASTER_FILE_NAME)
    }

    /// Full path of the ledger file
    pub fn ledger_file(&self) -> PathBuf {
        self.processed_files.join(LEDGER_FILE_NAME)
    }

    /// Full path of a batch's output sheet
    pub fn output_file(&self, batch: &BatchId) -> PathBuf {
        self.output.join(batch.output_file_name())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `-v` nor `RUST_LOG` is given
    pub level: String,
    /// Log to this file in addition to the console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
