//! Core error types.

use thiserror::Error;

use crate::catalog::ScalarType;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors.
///
/// Every validation failure is raised before the row set is touched, so an
/// `Err` from a mutating call always means the table is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Row length does not match the schema.
    #[error("table '{table}' expects {expected} values per row, got {actual}")]
    SchemaArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Value does not match the column's declared type.
    #[error("column '{column}' expects {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ScalarType,
        /// Name of the offending value's kind (`null` for a null in a
        /// non-nullable column).
        actual: String,
    },

    /// Referenced value is absent from the referenced table.
    #[error("foreign key {value} of '{table}' does not exist in {referenced_table}.{referenced_column}")]
    ForeignKeyViolation {
        table: String,
        value: String,
        referenced_table: String,
        referenced_column: String,
    },

    /// Column is not part of the table's schema.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Rollback or commit without an outstanding savepoint.
    #[error("no active savepoint on table '{table}'")]
    NoActiveSavepoint { table: String },

    /// Dropping a database that does not exist.
    #[error("cannot drop database '{database}': {reason}")]
    Deletion { database: String, reason: String },

    /// Table name is unknown to the database or store.
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Table name is already taken in this database.
    #[error("table '{0}' already exists")]
    DuplicateTable(String),

    /// Schema definition is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Failure reported by a storage collaborator.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the caller may report this error and carry on.
    ///
    /// Recoverable errors leave every table in its prior state and signal a
    /// no-op rather than a rejected mutation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoActiveSavepoint { .. } | Error::Deletion { .. })
    }
}
