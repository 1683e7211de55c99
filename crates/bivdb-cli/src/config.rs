//! CLI configuration.

use std::path::PathBuf;

use bivdb_core::DatabaseConfig;

use crate::error::{CliError, Result};
use crate::formatter::OutputFormat;
use crate::store::JsonDirStore;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "bivdb-data";

/// Command-line client configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Root directory of the JSON store.
    pub data_dir: PathBuf,

    /// Output format for results.
    pub format: OutputFormat,

    /// Engine configuration for every database the CLI opens.
    pub database: DatabaseConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl CliConfig {
    /// Create a configuration rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            format: OutputFormat::default(),
            database: DatabaseConfig::default(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the engine configuration.
    pub fn with_database_config(mut self, database: DatabaseConfig) -> Self {
        self.database = database;
        self
    }

    /// Check the data directory is usable. It may not exist yet.
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(CliError::invalid(format!(
                "data directory {} is not a directory",
                self.data_dir.display()
            )));
        }
        Ok(())
    }

    /// Open the store this configuration points at.
    pub fn store(&self) -> JsonDirStore {
        JsonDirStore::new(&self.data_dir)
    }
}
