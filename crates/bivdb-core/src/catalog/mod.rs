//! Table catalog: declared types, columns, schemas and constraints.

mod column;
mod constraint;
mod definition;
mod schema;
mod types;

pub use column::ColumnDef;
pub use constraint::ForeignKeyDef;
pub use definition::TableDef;
pub use schema::Schema;
pub use types::ScalarType;
