//! Storage seam.
//!
//! The engine never reads or writes durable storage itself. Collaborators
//! implement [`TableStore`] and the [`Database`](crate::Database) calls
//! through it to load, save, list and refresh tables. How a
//! [`StoredTable`] is laid out on disk is entirely the store's business.

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::table::{StoredTable, Table};

/// Persistence collaborator for databases and their tables.
pub trait TableStore {
    /// Load a table image by name.
    fn load_table(&self, database: &str, table: &str) -> Result<StoredTable>;

    /// Persist a table image, replacing any previous image of the same name.
    fn save_table(&self, database: &str, table: &StoredTable) -> Result<()>;

    /// Names of the tables stored for a database, sorted.
    fn list_tables(&self, database: &str) -> Result<Vec<String>>;

    /// Remove a database and all its tables. Fails with
    /// [`Error::Deletion`](crate::Error::Deletion) when it does not exist.
    fn drop_database(&self, database: &str) -> Result<()>;

    /// Re-sync hook for a loaded table. Returning `Some` replaces the
    /// table's rows and activation flag with the returned image; the
    /// default leaves the table as it is.
    fn refresh(&self, _database: &str, _table: &Table) -> Result<Option<StoredTable>> {
        Ok(None)
    }
}
