//! Constraint validation logic.
//!
//! The ConstraintValidator checks a candidate row (or a replacement value)
//! against the owning table's schema and, when the table is active, against
//! the referenced table's current rows. It never mutates anything.

use crate::catalog::{ColumnDef, Schema};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::{Row, Value};

/// Constraint validator for enforcing table constraints.
pub struct ConstraintValidator<'a> {
    database: &'a Database,
}

impl<'a> ConstraintValidator<'a> {
    /// Create a new constraint validator.
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Validate all constraints for an insert.
    ///
    /// Checks, in order:
    /// - row arity
    /// - declared type and nullability of every value
    /// - the foreign key, when the table is active
    pub fn validate_insert(&self, table: &Table, row: &Row) -> Result<()> {
        check_row_shape(table.name(), table.schema(), row)?;

        if let Some(fk) = table.foreign_key() {
            if table.is_active() {
                self.check_foreign_key(table, &row[fk.column_index])?;
            }
        }

        Ok(())
    }

    /// Validate a replacement value for one column of an update.
    ///
    /// The foreign key is only consulted when the updated column is the
    /// foreign key column.
    pub fn validate_update(&self, table: &Table, column: usize, value: &Value) -> Result<()> {
        check_value(&table.schema().columns()[column], value)?;

        if let Some(fk) = table.foreign_key() {
            if table.is_active() && fk.column_index == column {
                self.check_foreign_key(table, value)?;
            }
        }

        Ok(())
    }

    /// Check that a non-null reference exists in the referenced table.
    fn check_foreign_key(&self, table: &Table, value: &Value) -> Result<()> {
        let Some(fk) = table.foreign_key() else {
            return Ok(());
        };

        // NULL FK is allowed
        if value.is_null() {
            return Ok(());
        }

        let referenced = self.database.table_by_id(fk.target);
        if referenced.contains_value(fk.target_index, value) {
            Ok(())
        } else {
            Err(Error::ForeignKeyViolation {
                table: table.name().to_string(),
                value: value.to_string(),
                referenced_table: fk.references_table.clone(),
                referenced_column: fk.references_column.clone(),
            })
        }
    }
}

/// Check arity, types and nullability of a row against a schema.
pub fn check_row_shape(table: &str, schema: &Schema, row: &Row) -> Result<()> {
    if row.len() != schema.len() {
        return Err(Error::SchemaArity {
            table: table.to_string(),
            expected: schema.len(),
            actual: row.len(),
        });
    }

    for (column, value) in schema.columns().iter().zip(row) {
        check_value(column, value)?;
    }

    Ok(())
}

/// Check a single value against its column.
pub fn check_value(column: &ColumnDef, value: &Value) -> Result<()> {
    let fits = if value.is_null() {
        column.nullable
    } else {
        value.conforms_to(column.column_type)
    };

    if fits {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            column: column.name.clone(),
            expected: column.column_type,
            actual: value.kind_name().to_string(),
        })
    }
}
