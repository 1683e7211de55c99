//! Table definitions.

use serde::{Deserialize, Serialize};

use super::column::ColumnDef;
use super::constraint::ForeignKeyDef;
use super::types::ScalarType;

/// Everything needed to create a table: name, columns, key and an optional
/// foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name (unique within a database).
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Name of the primary key column.
    pub primary_key: String,
    /// Optional reference to another table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyDef>,
}

impl TableDef {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: primary_key.into(),
            foreign_key: None,
        }
    }

    /// Add a column.
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a nullable column of the given type.
    pub fn column(self, name: impl Into<String>, column_type: ScalarType) -> Self {
        self.with_column(ColumnDef::new(name, column_type))
    }

    /// Declare a foreign key.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDef) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_def_builder() {
        let def = TableDef::new("table1", "id")
            .column("id", ScalarType::Integer)
            .with_column(ColumnDef::new("name", ScalarType::Text).not_null())
            .with_foreign_key(ForeignKeyDef::new("table2"));

        assert_eq!(def.columns.len(), 2);
        assert_eq!(def.primary_key, "id");
        assert!(!def.columns[1].nullable);
        assert_eq!(
            def.foreign_key.map(|fk| fk.references_table),
            Some("table2".to_string())
        );
    }
}
