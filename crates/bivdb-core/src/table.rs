//! Tables: an ordered row set with its schema, key, optional foreign key,
//! activation flag and savepoint.
//!
//! Mutation goes through [`TableMut`](crate::database::TableMut), which has
//! the database context needed to check foreign keys. This module holds the
//! row-level primitives those checks guard.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{ColumnDef, ForeignKeyDef, Schema, TableDef};
use crate::database::TableId;
use crate::error::{Error, Result};
use crate::transaction::{Savepoint, TransactionState};
use crate::value::{Row, Value};

/// A foreign key resolved against its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Owning column name.
    pub column: String,
    /// Referenced table name.
    pub references_table: String,
    /// Referenced column name.
    pub references_column: String,
    pub(crate) column_index: usize,
    pub(crate) target: TableId,
    pub(crate) target_index: usize,
}

impl ForeignKey {
    /// Handle of the referenced table in the owning database.
    pub fn target(&self) -> TableId {
        self.target
    }
}

/// A table owned by a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    primary_key: usize,
    foreign_key: Option<ForeignKey>,
    active: bool,
    rows: Vec<Row>,
    savepoint: Savepoint,
}

/// Serializable image of a table handed to storage collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTable {
    /// Table definition.
    pub definition: TableDef,
    /// Whether constraint enforcement was on.
    #[serde(default)]
    pub active: bool,
    /// Rows in insertion order.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new(
        name: String,
        schema: Schema,
        primary_key: usize,
        foreign_key: Option<ForeignKey>,
    ) -> Self {
        Self {
            name,
            schema,
            primary_key,
            foreign_key,
            active: false,
            rows: Vec::new(),
            savepoint: Savepoint::default(),
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Primary key column name.
    pub fn primary_key(&self) -> &str {
        &self.schema.columns()[self.primary_key].name
    }

    /// Primary key column position.
    pub fn primary_key_index(&self) -> usize {
        self.primary_key
    }

    /// Resolved foreign key, if declared.
    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.foreign_key.as_ref()
    }

    /// Whether foreign key enforcement is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row holds `value` in the given column. Linear scan.
    pub fn contains_value(&self, column: usize, value: &Value) -> bool {
        self.rows.iter().any(|row| row.get(column) == Some(value))
    }

    /// Savepoint state.
    pub fn transaction_state(&self) -> TransactionState {
        self.savepoint.state()
    }

    /// Reconstruct the definition this table was created from.
    pub fn definition(&self) -> TableDef {
        let mut def = TableDef::new(self.name.clone(), self.primary_key());
        def.columns = self.schema.columns().to_vec();
        def.foreign_key = self.foreign_key.as_ref().map(|fk| ForeignKeyDef {
            column: (fk.column_index != self.primary_key).then(|| fk.column.clone()),
            references_table: fk.references_table.clone(),
            references_column: Some(fk.references_column.clone()),
        });
        def
    }

    /// Snapshot for storage.
    pub fn to_stored(&self) -> StoredTable {
        StoredTable {
            definition: self.definition(),
            active: self.active,
            rows: self.rows.clone(),
        }
    }

    /// Summary of the table's shape and state.
    pub fn metadata(&self) -> TableMetadata {
        TableMetadata {
            name: self.name.clone(),
            columns: self.schema.columns().to_vec(),
            primary_key: self.primary_key().to_string(),
            foreign_key: self.foreign_key.as_ref().map(|fk| {
                format!(
                    "{} -> {}.{}",
                    fk.column, fk.references_table, fk.references_column
                )
            }),
            active: self.active,
            row_count: self.rows.len(),
            transaction: self.transaction_state(),
        }
    }

    pub(crate) fn push_row(&mut self, row: Row) {
        debug!(table = %self.name, row = ?row, "row inserted");
        self.rows.push(row);
    }

    /// Positions of rows matching `predicate`.
    pub(crate) fn matching<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&Row) -> bool,
    {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate(row))
            .map(|(i, _)| i)
            .collect()
    }

    /// Overwrite one column in the given rows.
    pub(crate) fn set_column(&mut self, positions: &[usize], column: usize, value: &Value) {
        for &i in positions {
            self.rows[i][column] = value.clone();
        }
        debug!(
            table = %self.name,
            column = %self.schema.columns()[column].name,
            updated = positions.len(),
            "rows updated"
        );
    }

    pub(crate) fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Row) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        let removed = before - self.rows.len();
        debug!(table = %self.name, removed, "rows removed");
        removed
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn savepoint(&mut self) {
        if self.savepoint.capture(&self.rows) {
            debug!(table = %self.name, "previous savepoint discarded");
        }
        debug!(table = %self.name, rows = self.rows.len(), "savepoint taken");
    }

    pub(crate) fn rollback(&mut self) -> Result<()> {
        match self.savepoint.take_for_rollback() {
            Some(rows) => {
                debug!(table = %self.name, rows = rows.len(), "rolled back to savepoint");
                self.rows = rows;
                Ok(())
            }
            None => {
                warn!(table = %self.name, "rollback without an active savepoint");
                Err(Error::NoActiveSavepoint {
                    table: self.name.clone(),
                })
            }
        }
    }

    pub(crate) fn commit(&mut self) -> Result<()> {
        if self.savepoint.release() {
            debug!(table = %self.name, "savepoint committed");
            Ok(())
        } else {
            warn!(table = %self.name, "commit without an active savepoint");
            Err(Error::NoActiveSavepoint {
                table: self.name.clone(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.schema.column_names().collect::<Vec<_>>().join(" | ");
        writeln!(f, "Table {}:", self.name)?;
        writeln!(f, "{}", header)?;
        write!(f, "{}", "-".repeat(header.len()))?;
        for row in &self.rows {
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// Shape and state summary of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: String,
    /// `column -> table.column` when declared.
    pub foreign_key: Option<String>,
    pub active: bool,
    pub row_count: usize,
    pub transaction: TransactionState,
}

impl fmt::Display for TableMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "table: {}", self.name)?;
        writeln!(f, "columns:")?;
        for column in &self.columns {
            let null = if column.nullable { "" } else { " not null" };
            writeln!(f, "  {} {}{}", column.name, column.column_type, null)?;
        }
        writeln!(f, "primary key: {}", self.primary_key)?;
        if let Some(fk) = &self.foreign_key {
            writeln!(f, "foreign key: {}", fk)?;
        }
        writeln!(f, "active: {}", self.active)?;
        write!(f, "rows: {}", self.row_count)
    }
}
