//! Declared column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar data types a column can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// UTF-8 string.
    Text,
    /// Boolean value.
    Boolean,
}

impl ScalarType {
    /// Lowercase name used in messages and metadata.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Text => "text",
            ScalarType::Boolean => "boolean",
        }
    }

    /// Parse a type name. Accepts a few common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Some(ScalarType::Integer),
            "float" | "real" => Some(ScalarType::Float),
            "text" | "str" | "string" => Some(ScalarType::Text),
            "boolean" | "bool" => Some(ScalarType::Boolean),
            _ => None,
        }
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
