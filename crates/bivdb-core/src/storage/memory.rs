//! In-memory table store.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use super::TableStore;
use crate::error::{Error, Result};
use crate::table::StoredTable;

/// A [`TableStore`] that keeps table images in memory.
///
/// Useful for tests and for embedding the engine without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: RwLock<HashMap<String, BTreeMap<String, StoredTable>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a database has any saved state.
    pub fn database_exists(&self, database: &str) -> bool {
        self.databases.read().contains_key(database)
    }
}

impl TableStore for MemoryStore {
    fn load_table(&self, database: &str, table: &str) -> Result<StoredTable> {
        self.databases
            .read()
            .get(database)
            .and_then(|tables| tables.get(table))
            .cloned()
            .ok_or_else(|| Error::TableNotFound(table.to_string()))
    }

    fn save_table(&self, database: &str, table: &StoredTable) -> Result<()> {
        debug!(database, table = %table.definition.name, "saving table in memory");
        self.databases
            .write()
            .entry(database.to_string())
            .or_default()
            .insert(table.definition.name.clone(), table.clone());
        Ok(())
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        self.databases
            .read()
            .get(database)
            .map(|tables| tables.keys().cloned().collect())
            .ok_or_else(|| Error::Storage(format!("database '{}' does not exist", database)))
    }

    fn drop_database(&self, database: &str) -> Result<()> {
        match self.databases.write().remove(database) {
            Some(_) => Ok(()),
            None => Err(Error::Deletion {
                database: database.to_string(),
                reason: "database does not exist".into(),
            }),
        }
    }
}
