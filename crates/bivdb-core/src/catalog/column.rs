//! Column definitions.

use serde::{Deserialize, Serialize};

use super::types::ScalarType;

/// A single column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub column_type: ScalarType,
    /// Whether the column accepts null.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, column_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }

    /// Mark the column as rejecting null.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let column = ColumnDef::new("id", ScalarType::Integer);
        assert!(column.nullable);

        let column = column.not_null();
        assert!(!column.nullable);
        assert_eq!(column.name, "id");
    }

    #[test]
    fn test_nullable_defaults_when_missing() {
        let column: ColumnDef =
            serde_json::from_str(r#"{"name":"name","column_type":"text"}"#).unwrap();
        assert!(column.nullable);
        assert_eq!(column.column_type, ScalarType::Text);
    }
}
