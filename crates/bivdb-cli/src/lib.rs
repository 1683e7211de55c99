//! bivdb command-line front end.
//!
//! Provides the subcommands behind the `bivdb` binary, output formatters,
//! and [`JsonDirStore`], a [`TableStore`](bivdb_core::TableStore) that keeps
//! one JSON file per table.

pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod store;

pub use commands::{execute, Command};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use formatter::{create_formatter, Formatter, OutputFormat};
pub use store::JsonDirStore;
