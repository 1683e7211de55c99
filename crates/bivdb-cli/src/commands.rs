//! Subcommand definitions and execution.
//!
//! Every command opens a fresh [`Database`], loads the tables it touches from
//! the store, and saves the table back after a successful mutation.

use bivdb_core::{
    ColumnDef, Database, Error, ForeignKeyDef, JoinKind, JoinSpec, Row, ScalarType, Schema,
    TableDef, TableStore, Value,
};
use clap::{Subcommand, ValueEnum};
use tracing::{debug, warn};

use crate::config::CliConfig;
use crate::error::Result;
use crate::formatter::{create_formatter, Formatter};

/// Join kind accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JoinKindArg {
    /// Every left row, matched or null-padded
    Left,
    /// Every right row, matched or null-padded
    Right,
    /// Every row of both sides
    Full,
}

impl From<JoinKindArg> for JoinKind {
    fn from(kind: JoinKindArg) -> Self {
        match kind {
            JoinKindArg::Left => JoinKind::Left,
            JoinKindArg::Right => JoinKind::Right,
            JoinKindArg::Full => JoinKind::Full,
        }
    }
}

/// bivdb subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a table
    Create {
        /// Database name
        database: String,
        /// Table name
        table: String,
        /// Column as name:type[:not-null]; repeat for each column
        #[arg(long = "column", required = true, value_parser = parse_column)]
        columns: Vec<ColumnDef>,
        /// Primary key column
        #[arg(long)]
        primary_key: String,
        /// Referenced table, as table or table.column
        #[arg(long, value_parser = parse_reference)]
        references: Option<ForeignKeyDef>,
        /// Owning column of the foreign key (defaults to the primary key)
        #[arg(long, requires = "references")]
        fk_column: Option<String>,
    },

    /// List the tables of a database
    List {
        /// Database name
        database: String,
    },

    /// Print the rows of a table
    Show {
        /// Database name
        database: String,
        /// Table name
        table: String,
    },

    /// Describe a table
    Metadata {
        /// Database name
        database: String,
        /// Table name
        table: String,
    },

    /// Append a row; values are parsed by column type, `null` for null,
    /// `\null` for the text "null"
    Insert {
        /// Database name
        database: String,
        /// Table name
        table: String,
        /// One value per column
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Set a column on the rows whose primary key equals --key
    Update {
        /// Database name
        database: String,
        /// Table name
        table: String,
        /// Primary key value to match
        #[arg(long, allow_hyphen_values = true)]
        key: String,
        /// Column to set
        #[arg(long)]
        column: String,
        /// New value (`null` for null, `\null` for the text "null")
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Delete the rows whose primary key equals --key
    Remove {
        /// Database name
        database: String,
        /// Table name
        table: String,
        /// Primary key value to match
        #[arg(long, allow_hyphen_values = true)]
        key: String,
    },

    /// Turn foreign key enforcement on (or off with --off)
    Activate {
        /// Database name
        database: String,
        /// Table name
        table: String,
        /// Deactivate instead
        #[arg(long)]
        off: bool,
    },

    /// Join two tables on key equality
    Join {
        /// Database name
        database: String,
        /// Left table
        left: String,
        /// Right table
        right: String,
        /// Join kind
        #[arg(long, value_enum, default_value = "left")]
        kind: JoinKindArg,
        /// Right-hand key column (defaults to the right table's primary key)
        #[arg(long)]
        on: Option<String>,
    },

    /// Delete a database and all its tables
    Drop {
        /// Database name
        database: String,
    },
}

/// Parse `name:type[:not-null]`.
pub fn parse_column(spec: &str) -> std::result::Result<ColumnDef, String> {
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default().trim();
    let ty = parts
        .next()
        .ok_or_else(|| format!("column '{}' needs a type (name:type)", spec))?;
    let column_type = ScalarType::from_name(ty.trim())
        .ok_or_else(|| format!("unknown column type '{}'", ty))?;

    let column = ColumnDef::new(name, column_type);
    match parts.next().map(str::trim) {
        None => Ok(column),
        Some("not-null" | "notnull") => Ok(column.not_null()),
        Some(other) => Err(format!("unknown column option '{}'", other)),
    }
}

/// Parse `table` or `table.column`.
pub fn parse_reference(spec: &str) -> std::result::Result<ForeignKeyDef, String> {
    if spec.trim().is_empty() {
        return Err("empty table reference".to_string());
    }
    Ok(ForeignKeyDef::parse(spec.trim()))
}

/// Parse a literal for a column of type `ty`. Text that does not parse is
/// kept as text, so the engine reports the type mismatch.
///
/// For text columns a leading backslash is dropped and the rest taken
/// verbatim, so `\null` stores the text `null`.
fn parse_literal(text: &str, ty: ScalarType) -> Value {
    if ty == ScalarType::Text {
        if let Some(escaped) = text.strip_prefix('\\') {
            return Value::Text(escaped.to_string());
        }
    }
    Value::parse(text, ty).unwrap_or_else(|| Value::Text(text.to_string()))
}

fn parse_row(schema: &Schema, values: &[String]) -> Row {
    values
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let ty = schema
                .columns()
                .get(i)
                .map(|c| c.column_type)
                .unwrap_or(ScalarType::Text);
            parse_literal(text, ty)
        })
        .collect()
}

fn open(config: &CliConfig, database: &str) -> Database {
    Database::with_config(database, config.database.clone())
}

fn load(config: &CliConfig, store: &dyn TableStore, database: &str, table: &str) -> Result<Database> {
    let mut db = open(config, database);
    db.load_table(store, table)?;
    Ok(db)
}

/// Primary key position and parsed key value for `table`.
fn key_of(db: &Database, table: &str, key: &str) -> Result<(usize, Value)> {
    let t = db.table(table)?;
    let pk = t.primary_key_index();
    Ok((pk, parse_literal(key, t.schema().columns()[pk].column_type)))
}

/// Execute a command and return its formatted output.
pub fn execute(command: &Command, config: &CliConfig, store: &dyn TableStore) -> Result<String> {
    debug!(?command, "executing command");
    config.validate()?;
    let fmt = create_formatter(config.format);
    let fmt = fmt.as_ref();

    match command {
        Command::Create {
            database,
            table,
            columns,
            primary_key,
            references,
            fk_column,
        } => {
            let mut def = TableDef::new(table, primary_key);
            def.columns = columns.clone();
            if let Some(fk) = references {
                let fk = match fk_column {
                    Some(column) => fk.clone().on_column(column),
                    None => fk.clone(),
                };
                def = def.with_foreign_key(fk);
            }
            create(config, store, database, def, fmt)
        }

        Command::List { database } => {
            let names = open(config, database).list_tables(store)?;
            Ok(fmt.format_names("Table", &names))
        }

        Command::Show { database, table } => {
            let db = load(config, store, database, table)?;
            let t = db.table(table)?;
            let columns: Vec<String> = t.schema().column_names().map(String::from).collect();
            Ok(fmt.format_rows(&columns, t.rows()))
        }

        Command::Metadata { database, table } => {
            let db = load(config, store, database, table)?;
            Ok(fmt.format_metadata(&db.metadata(table)?))
        }

        Command::Insert {
            database,
            table,
            values,
        } => {
            let mut db = load(config, store, database, table)?;
            let row = parse_row(db.table(table)?.schema(), values);
            db.table_mut(table)?.insert(row)?;
            db.save_table(store, table)?;
            Ok(fmt.format_mutation_result(1, "inserted"))
        }

        Command::Update {
            database,
            table,
            key,
            column,
            value,
        } => {
            let mut db = load(config, store, database, table)?;
            let (pk, key) = key_of(&db, table, key)?;
            let ty = db
                .table(table)?
                .schema()
                .column(column)
                .map(|c| c.column_type)
                .unwrap_or(ScalarType::Text);

            let changed = db
                .table_mut(table)?
                .update(column, |row| row[pk] == key, parse_literal(value, ty))?;
            if changed == 0 {
                return Ok(fmt.format_message("no row found"));
            }
            db.save_table(store, table)?;
            Ok(fmt.format_mutation_result(changed, "updated"))
        }

        Command::Remove {
            database,
            table,
            key,
        } => {
            let mut db = load(config, store, database, table)?;
            let (pk, key) = key_of(&db, table, key)?;
            let removed = db.table_mut(table)?.remove(|row| row[pk] == key);
            if removed == 0 {
                return Ok(fmt.format_message("no row found"));
            }
            db.save_table(store, table)?;
            Ok(fmt.format_mutation_result(removed, "removed"))
        }

        Command::Activate {
            database,
            table,
            off,
        } => {
            let mut db = load(config, store, database, table)?;
            db.table_mut(table)?.activate(!off);
            db.save_table(store, table)?;
            let state = if *off { "inactive" } else { "active" };
            Ok(fmt.format_message(&format!("Table '{}' is now {}", table, state)))
        }

        Command::Join {
            database,
            left,
            right,
            kind,
            on,
        } => {
            let mut db = load(config, store, database, left)?;
            db.load_table(store, right)?;

            let mut spec = JoinSpec::new((*kind).into());
            if let Some(column) = on {
                spec = spec.on(column);
            }
            let joined = db.join(left, right, &spec)?;
            Ok(fmt.format_rows(joined.columns(), joined.rows()))
        }

        Command::Drop { database } => match store.drop_database(database) {
            Ok(()) => Ok(fmt.format_message(&format!("Database '{}' dropped", database))),
            Err(e @ Error::Deletion { .. }) => {
                warn!(database = %database, error = %e, "nothing to drop");
                Ok(fmt.format_message(&format!("warning: {}", e)))
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn create(
    config: &CliConfig,
    store: &dyn TableStore,
    database: &str,
    def: TableDef,
    fmt: &dyn Formatter,
) -> Result<String> {
    let exists = store
        .list_tables(database)
        .map(|names| names.contains(&def.name))
        .unwrap_or(false);
    if exists {
        return Err(Error::DuplicateTable(def.name).into());
    }

    let mut db = open(config, database);
    if let Some(fk) = &def.foreign_key {
        if fk.references_table != def.name {
            db.load_table(store, &fk.references_table)?;
        }
    }

    let name = def.name.clone();
    db.create_table(def)?;
    db.save_table(store, &name)?;
    Ok(fmt.format_message(&format!("Table '{}' created", name)))
}
