//! Databases: named collections of tables.
//!
//! The database owns every table. Foreign keys refer to other tables by
//! [`TableId`], an index into this collection, so tables never own each
//! other and a table can reference itself.

use std::collections::HashMap;
use std::ops::Deref;

use tracing::{debug, info};

use crate::catalog::{ForeignKeyDef, Schema, TableDef};
use crate::config::DatabaseConfig;
use crate::constraint::{check_row_shape, ConstraintValidator};
use crate::error::{Error, Result};
use crate::query::{JoinSpec, JoinedRows};
use crate::storage::TableStore;
use crate::table::{ForeignKey, StoredTable, Table, TableMetadata};
use crate::value::{Row, Value};

/// Handle to a table within its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

/// A named collection of tables.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    config: DatabaseConfig,
    tables: Vec<Table>,
    by_name: HashMap<String, TableId>,
}

impl Database {
    /// Create an empty database with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, DatabaseConfig::default())
    }

    /// Create an empty database.
    pub fn with_config(name: impl Into<String>, config: DatabaseConfig) -> Self {
        Self {
            name: name.into(),
            config,
            tables: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Create a table and return a handle for populating it.
    ///
    /// A foreign key's referenced table must already exist, unless it is
    /// this table itself.
    pub fn create_table(&mut self, def: TableDef) -> Result<TableMut<'_>> {
        if self.by_name.contains_key(&def.name) {
            return Err(Error::DuplicateTable(def.name));
        }

        let schema = Schema::new(def.columns)?;
        let primary_key = schema
            .index_of(&def.primary_key)
            .ok_or_else(|| Error::ColumnNotFound {
                table: def.name.clone(),
                column: def.primary_key.clone(),
            })?;

        let id = TableId(self.tables.len());
        let foreign_key = match &def.foreign_key {
            Some(fk) => Some(self.resolve_foreign_key(&def.name, &schema, primary_key, id, fk)?),
            None => None,
        };

        info!(
            database = %self.name,
            table = %def.name,
            columns = schema.len(),
            references = foreign_key.as_ref().map(|fk| fk.references_table.as_str()),
            "table created"
        );

        self.tables
            .push(Table::new(def.name.clone(), schema, primary_key, foreign_key));
        self.by_name.insert(def.name, id);

        Ok(TableMut { db: self, id })
    }

    fn resolve_foreign_key(
        &self,
        name: &str,
        schema: &Schema,
        primary_key: usize,
        id: TableId,
        fk: &ForeignKeyDef,
    ) -> Result<ForeignKey> {
        let column_index = match &fk.column {
            Some(column) => schema.index_of(column).ok_or_else(|| Error::ColumnNotFound {
                table: name.to_string(),
                column: column.clone(),
            })?,
            None => primary_key,
        };

        // Self-references resolve against the schema being created.
        let (target, target_schema, target_pk) = if fk.references_table == name {
            (id, schema, primary_key)
        } else {
            let target = self.table_id(&fk.references_table).ok_or_else(|| {
                Error::TableNotFound(fk.references_table.clone())
            })?;
            let table = self.table_by_id(target);
            (target, table.schema(), table.primary_key_index())
        };

        let target_index = match &fk.references_column {
            Some(column) => {
                target_schema
                    .index_of(column)
                    .ok_or_else(|| Error::ColumnNotFound {
                        table: fk.references_table.clone(),
                        column: column.clone(),
                    })?
            }
            None => target_pk,
        };

        let owning = &schema.columns()[column_index];
        let referenced = &target_schema.columns()[target_index];
        if owning.column_type != referenced.column_type {
            return Err(Error::InvalidSchema(format!(
                "foreign key {}.{} ({}) cannot reference {}.{} ({})",
                name,
                owning.name,
                owning.column_type,
                fk.references_table,
                referenced.name,
                referenced.column_type
            )));
        }

        Ok(ForeignKey {
            column: owning.name.clone(),
            references_table: fk.references_table.clone(),
            references_column: referenced.name.clone(),
            column_index,
            target,
            target_index,
        })
    }

    /// Look up a table handle by name.
    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.by_name.get(name).copied()
    }

    /// Check if a table exists.
    pub fn table_exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Borrow a table by name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.table_id(name)
            .map(|id| self.table_by_id(id))
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Borrow a table by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different database.
    pub fn table_by_id(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// Mutable handle to a table by name.
    pub fn table_mut(&mut self, name: &str) -> Result<TableMut<'_>> {
        let id = self
            .table_id(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        Ok(TableMut { db: self, id })
    }

    /// Tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Table names in creation order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name())
    }

    /// Metadata for a table.
    pub fn metadata(&self, name: &str) -> Result<TableMetadata> {
        self.table(name).map(Table::metadata)
    }

    /// Join two tables by name.
    pub fn join(&self, left: &str, right: &str, spec: &JoinSpec) -> Result<JoinedRows> {
        spec.execute(self.table(left)?, self.table(right)?)
    }

    /// Load a table from `store`, loading its referenced table first when
    /// needed. Already-loaded tables are returned as-is.
    ///
    /// Stored rows are checked against the schema but foreign keys are not
    /// re-checked: they were enforced (or deliberately not) when inserted.
    pub fn load_table(&mut self, store: &dyn TableStore, name: &str) -> Result<TableId> {
        let mut loading = Vec::new();
        self.load_with(store, name, &mut loading)
    }

    fn load_with(
        &mut self,
        store: &dyn TableStore,
        name: &str,
        loading: &mut Vec<String>,
    ) -> Result<TableId> {
        if let Some(id) = self.table_id(name) {
            return Ok(id);
        }
        if loading.iter().any(|n| n == name) {
            return Err(Error::InvalidSchema(format!(
                "cyclic foreign keys while loading '{}'",
                name
            )));
        }

        let stored = store.load_table(&self.name, name)?;
        if stored.definition.name != name {
            return Err(Error::Storage(format!(
                "store returned table '{}' for '{}'",
                stored.definition.name, name
            )));
        }

        if let Some(fk) = &stored.definition.foreign_key {
            if fk.references_table != name {
                loading.push(name.to_string());
                self.load_with(store, &fk.references_table, loading)?;
                loading.pop();
            }
        }

        let StoredTable {
            definition,
            active,
            rows,
        } = stored;
        let schema = Schema::new(definition.columns.clone())?;
        for row in &rows {
            check_row_shape(&definition.name, &schema, row)?;
        }

        let mut handle = self.create_table(definition)?;
        let id = handle.id;
        let table = handle.table_mut();
        for row in rows {
            table.push_row(row);
        }
        table.set_active(active);

        info!(database = %self.name, table = name, rows = self.table_by_id(id).len(), "table loaded");
        Ok(id)
    }

    /// Save a table image to `store`.
    pub fn save_table(&self, store: &dyn TableStore, name: &str) -> Result<()> {
        let table = self.table(name)?;
        store.save_table(&self.name, &table.to_stored())?;
        info!(database = %self.name, table = name, rows = table.len(), "table saved");
        Ok(())
    }

    /// Names of the tables `store` holds for this database.
    pub fn list_tables(&self, store: &dyn TableStore) -> Result<Vec<String>> {
        store.list_tables(&self.name)
    }
}

/// Mutable access to one table of a database.
///
/// Every mutation is validated before it is applied, so a failed call leaves
/// the table exactly as it was. Dereferences to [`Table`] for reads.
#[derive(Debug)]
pub struct TableMut<'db> {
    db: &'db mut Database,
    id: TableId,
}

impl<'db> TableMut<'db> {
    /// Handle of this table.
    pub fn id(&self) -> TableId {
        self.id
    }

    fn table_mut(&mut self) -> &mut Table {
        &mut self.db.tables[self.id.0]
    }

    /// Append a row after checking arity, types and (when active) the
    /// foreign key.
    pub fn insert(&mut self, row: Row) -> Result<&mut Self> {
        let table = self.db.table_by_id(self.id);
        ConstraintValidator::new(self.db).validate_insert(table, &row)?;
        self.table_mut().push_row(row);
        Ok(self)
    }

    /// Set `column` to `value` in every row matching `predicate`, in place.
    /// Returns the number of rows changed.
    ///
    /// With [`DatabaseConfig::validate_updates`] on (the default), the new
    /// value goes through the same checks insert applies to that column.
    pub fn update<F>(&mut self, column: &str, predicate: F, value: impl Into<Value>) -> Result<usize>
    where
        F: Fn(&Row) -> bool,
    {
        let value = value.into();
        let table = self.db.table_by_id(self.id);
        let index = table
            .schema()
            .index_of(column)
            .ok_or_else(|| Error::ColumnNotFound {
                table: table.name().to_string(),
                column: column.to_string(),
            })?;

        let positions = table.matching(predicate);
        if positions.is_empty() {
            return Ok(0);
        }

        if self.db.config.validate_updates {
            ConstraintValidator::new(self.db).validate_update(table, index, &value)?;
        }

        self.table_mut().set_column(&positions, index, &value);
        Ok(positions.len())
    }

    /// Delete every row matching `predicate`. Returns the number removed.
    ///
    /// Rows elsewhere that referenced the removed values are not checked.
    pub fn remove<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Row) -> bool,
    {
        self.table_mut().remove_where(predicate)
    }

    /// Turn foreign key enforcement on or off.
    pub fn activate(&mut self, active: bool) -> &mut Self {
        debug!(table = %self.name(), active, "activation changed");
        self.table_mut().set_active(active);
        self
    }

    /// Snapshot the current rows, replacing any earlier snapshot.
    pub fn savepoint(&mut self) -> &mut Self {
        self.table_mut().savepoint();
        self
    }

    /// Restore the snapshot. Fails with `NoActiveSavepoint`, changing
    /// nothing, when there is none.
    pub fn rollback(&mut self) -> Result<&mut Self> {
        self.table_mut().rollback()?;
        Ok(self)
    }

    /// Keep the current rows and drop the snapshot. Fails with
    /// `NoActiveSavepoint`, changing nothing, when there is none.
    pub fn commit(&mut self) -> Result<&mut Self> {
        self.table_mut().commit()?;
        Ok(self)
    }

    /// Give the store a chance to re-sync this table. The default store
    /// behaviour leaves it untouched.
    pub fn refresh(&mut self, store: &dyn TableStore) -> Result<&mut Self> {
        let table = self.db.table_by_id(self.id);
        let Some(image) = store.refresh(&self.db.name, table)? else {
            return Ok(self);
        };

        for row in &image.rows {
            check_row_shape(table.name(), table.schema(), row)?;
        }

        let table = self.table_mut();
        table.remove_where(|_| true);
        for row in image.rows {
            table.push_row(row);
        }
        table.set_active(image.active);
        info!(table = %table.name(), rows = table.len(), "table refreshed");
        Ok(self)
    }
}

impl Deref for TableMut<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        self.db.table_by_id(self.id)
    }
}
