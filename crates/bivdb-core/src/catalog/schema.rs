//! Ordered table schemas.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::column::ColumnDef;
use super::types::ScalarType;
use crate::error::{Error, Result};

/// Ordered, immutable list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnDef>", into = "Vec<ColumnDef>")]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Build a schema, rejecting empty column lists and duplicate names.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidSchema("a table needs at least one column".into()));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.name.is_empty() {
                return Err(Error::InvalidSchema("column names must not be empty".into()));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Shorthand for a schema of nullable columns.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, ScalarType)>) -> Result<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, ty)| ColumnDef::new(name, ty))
                .collect(),
        )
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column definition by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl TryFrom<Vec<ColumnDef>> for Schema {
    type Error = Error;

    fn try_from(columns: Vec<ColumnDef>) -> Result<Self> {
        Schema::new(columns)
    }
}

impl From<Schema> for Vec<ColumnDef> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}
