//! Foreign key declarations.

use serde::{Deserialize, Serialize};

/// A declared foreign key, before it is resolved against a database.
///
/// `column` defaults to the owning table's primary key and
/// `references_column` to the referenced table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    /// Owning column holding the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Referenced table name.
    pub references_table: String,
    /// Referenced column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_column: Option<String>,
}

impl ForeignKeyDef {
    /// Reference another table's primary key from this table's primary key.
    pub fn new(references_table: impl Into<String>) -> Self {
        Self {
            column: None,
            references_table: references_table.into(),
            references_column: None,
        }
    }

    /// Use an explicit owning column.
    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Reference an explicit column of the referenced table.
    pub fn references_column(mut self, column: impl Into<String>) -> Self {
        self.references_column = Some(column.into());
        self
    }

    /// Parse `table` or `table.column`.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('.') {
            Some((table, column)) => Self::new(table).references_column(column),
            None => Self::new(spec),
        }
    }
}
