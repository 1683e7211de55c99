//! bivdb core: a small in-memory relational table engine.
//!
//! Tables have typed columns, a primary key and an optional foreign key whose
//! enforcement is switched on per table. Each table supports a single-level
//! savepoint, and any two tables can be joined (left, right or full) on key
//! equality. Persistence is delegated to a [`TableStore`] implementation.
//!
//! ```
//! use bivdb_core::{row, Database, ForeignKeyDef, ScalarType, TableDef};
//!
//! let mut db = Database::new("test");
//! db.create_table(
//!     TableDef::new("table2", "id")
//!         .column("id", ScalarType::Integer)
//!         .column("name", ScalarType::Text),
//! )?
//! .activate(true)
//! .insert(row![3, "Cindy"])?;
//!
//! let mut table1 = db.create_table(
//!     TableDef::new("table1", "id")
//!         .column("id", ScalarType::Integer)
//!         .column("name", ScalarType::Text)
//!         .with_foreign_key(ForeignKeyDef::new("table2")),
//! )?;
//! table1.activate(true);
//! table1.insert(row![3, None::<&str>])?;
//! assert!(table1.insert(row![1, "Python"]).is_err());
//! # Ok::<(), bivdb_core::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod constraint;
pub mod database;
pub mod error;
pub mod query;
pub mod storage;
pub mod table;
pub mod transaction;
pub mod value;

pub use catalog::{ColumnDef, ForeignKeyDef, ScalarType, Schema, TableDef};
pub use config::DatabaseConfig;
pub use constraint::ConstraintValidator;
pub use database::{Database, TableId, TableMut};
pub use error::{Error, Result};
pub use query::{full_join, left_join, right_join, JoinKind, JoinSpec, JoinedRows};
pub use storage::{MemoryStore, TableStore};
pub use table::{ForeignKey, StoredTable, Table, TableMetadata};
pub use transaction::TransactionState;
pub use value::{Row, Value};
