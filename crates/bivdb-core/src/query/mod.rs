//! Read-only queries over tables.

mod join;

pub use join::{full_join, left_join, right_join, JoinKind, JoinSpec, JoinedRows};
