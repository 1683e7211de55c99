//! Constraint enforcement module.
//!
//! - Row arity and declared types (always)
//! - Column nullability (always)
//! - Foreign keys (only while the owning table is active)

mod validator;

pub use validator::{check_row_shape, check_value, ConstraintValidator};
