//! Runtime values and rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ScalarType;

/// A single cell value.
///
/// Serialized untagged so stored rows read as plain JSON arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    Text(String),
}

/// An ordered sequence of values, one per schema column.
pub type Row = Vec<Value>;

/// Build a [`Row`] from anything convertible into [`Value`].
///
/// ```
/// use bivdb_core::{row, Value};
///
/// let r = row![1, "Alice", Value::Null];
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The declared type this value satisfies, or `None` for null.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ScalarType::Boolean),
            Value::Integer(_) => Some(ScalarType::Integer),
            Value::Float(_) => Some(ScalarType::Float),
            Value::Text(_) => Some(ScalarType::Text),
        }
    }

    /// Name of this value's kind, as reported in type errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Float(x) if !x.is_finite() => "non-finite float",
            _ => self.scalar_type().map_or("null", |ty| ty.name()),
        }
    }

    /// Whether a non-null value fits the declared type. Null always fits;
    /// nullability is the column's concern.
    ///
    /// NaN and infinities fit no type: JSON has no representation for them.
    pub fn conforms_to(&self, ty: ScalarType) -> bool {
        match self {
            Value::Float(x) if !x.is_finite() => false,
            _ => self.scalar_type().map_or(true, |actual| actual == ty),
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse a textual literal as the given type. `null` (any case) parses
    /// to [`Value::Null`] for every type.
    pub fn parse(text: &str, ty: ScalarType) -> Option<Value> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("null") {
            return Some(Value::Null);
        }

        match ty {
            ScalarType::Integer => trimmed.parse().ok().map(Value::Integer),
            ScalarType::Float => trimmed.parse().ok().map(Value::Float),
            ScalarType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "1" => Some(Value::Boolean(true)),
                "false" | "f" | "no" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
            ScalarType::Text => Some(Value::Text(text.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
