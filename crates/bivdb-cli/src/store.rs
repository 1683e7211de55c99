//! JSON directory store.
//!
//! Each database is a directory under the store root and each table a
//! pretty-printed JSON file inside it: `<root>/<db>/<table>.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bivdb_core::{Error, Result, StoredTable, TableStore};
use tracing::{debug, info};

const EXTENSION: &str = "json";

/// A [`TableStore`] backed by one JSON file per table.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Create a store rooted at `root`. Directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn database_dir(&self, database: &str) -> Result<PathBuf> {
        check_name("database", database)?;
        Ok(self.root.join(database))
    }

    fn table_path(&self, database: &str, table: &str) -> Result<PathBuf> {
        check_name("table", table)?;
        Ok(self
            .database_dir(database)?
            .join(format!("{}.{}", table, EXTENSION)))
    }
}

/// Names become path components, so they must not escape the store root.
fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(Error::Storage(format!("invalid {} name '{}'", kind, name)));
    }
    Ok(())
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Storage(format!("{}: {}", path.display(), err))
}

impl TableStore for JsonDirStore {
    fn load_table(&self, database: &str, table: &str) -> Result<StoredTable> {
        let path = self.table_path(database, table)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::TableNotFound(table.to_string()))
            }
            Err(e) => return Err(storage_error(&path, e)),
        };

        debug!(path = %path.display(), "loading table");
        serde_json::from_str(&text).map_err(|e| storage_error(&path, e))
    }

    fn save_table(&self, database: &str, table: &StoredTable) -> Result<()> {
        let path = self.table_path(database, &table.definition.name)?;
        let dir = self.database_dir(database)?;
        fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;

        let json = serde_json::to_string_pretty(table).map_err(|e| storage_error(&path, e))?;

        // Write then rename so a failed save leaves the previous image intact.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error(&path, e))?;

        debug!(path = %path.display(), rows = table.rows.len(), "table written");
        Ok(())
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let dir = self.database_dir(database)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::Storage(format!(
                    "database '{}' does not exist",
                    database
                )))
            }
            Err(e) => return Err(storage_error(&dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| storage_error(&dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn drop_database(&self, database: &str) -> Result<()> {
        let dir = self.database_dir(database)?;
        if !dir.is_dir() {
            return Err(Error::Deletion {
                database: database.to_string(),
                reason: "database does not exist".into(),
            });
        }

        fs::remove_dir_all(&dir).map_err(|e| Error::Deletion {
            database: database.to_string(),
            reason: e.to_string(),
        })?;
        info!(database, "database dropped");
        Ok(())
    }
}
