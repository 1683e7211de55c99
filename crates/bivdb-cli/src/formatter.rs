//! Output formatters for command results.

use bivdb_core::{Row, TableMetadata, Value};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a row set with its column labels.
    fn format_rows(&self, columns: &[String], rows: &[Row]) -> String;

    /// Format a list of names under a single heading.
    fn format_names(&self, heading: &str, names: &[String]) -> String;

    /// Format table metadata.
    fn format_metadata(&self, metadata: &TableMetadata) -> String;

    /// Format a mutation result.
    fn format_mutation_result(&self, affected: usize, message: &str) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_rows(&self, columns: &[String], rows: &[Row]) -> String {
        let mut table = Table::new();
        table.set_header(columns.iter().map(Cell::new).collect::<Vec<_>>());

        for row in rows {
            table.add_row(row.iter().map(|v| Cell::new(v.to_string())).collect::<Vec<_>>());
        }

        format!("{}\n{} row(s)", table, rows.len())
    }

    fn format_names(&self, heading: &str, names: &[String]) -> String {
        let mut table = Table::new();
        table.set_header(vec![heading]);

        for name in names {
            table.add_row(vec![name]);
        }

        table.to_string()
    }

    fn format_metadata(&self, metadata: &TableMetadata) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Column", "Type", "Nullable", "Key"]);

        for column in &metadata.columns {
            let key = if column.name == metadata.primary_key {
                "PK"
            } else {
                ""
            };
            table.add_row(vec![
                Cell::new(&column.name),
                Cell::new(column.column_type),
                Cell::new(if column.nullable { "yes" } else { "no" }),
                Cell::new(key),
            ]);
        }

        let mut output = format!("Table {}\n{}", metadata.name, table);
        if let Some(fk) = &metadata.foreign_key {
            output.push_str(&format!(
                "\nForeign key: {} ({})",
                fk,
                if metadata.active { "enforced" } else { "inactive" }
            ));
        }
        output.push_str(&format!(
            "\nRows: {}\nTransaction: {:?}",
            metadata.row_count, metadata.transaction
        ));
        output
    }

    fn format_mutation_result(&self, affected: usize, message: &str) -> String {
        if message.is_empty() {
            format!("{} row(s) affected", affected)
        } else {
            format!("{} row(s) affected: {}", affected, message)
        }
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_rows(&self, columns: &[String], rows: &[Row]) -> String {
        let rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let obj = columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| (name.clone(), value_to_json(value)))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_names(&self, _heading: &str, names: &[String]) -> String {
        serde_json::to_string_pretty(names).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_metadata(&self, metadata: &TableMetadata) -> String {
        let columns: Vec<serde_json::Value> = metadata
            .columns
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "type": c.column_type.name(),
                    "nullable": c.nullable,
                })
            })
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "name": metadata.name,
            "columns": columns,
            "primary_key": metadata.primary_key,
            "foreign_key": metadata.foreign_key,
            "active": metadata.active,
            "row_count": metadata.row_count,
            "transaction": format!("{:?}", metadata.transaction),
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_mutation_result(&self, affected: usize, message: &str) -> String {
        serde_json::json!({
            "affected": affected,
            "message": message
        })
        .to_string()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_rows(&self, columns: &[String], rows: &[Row]) -> String {
        let mut output = columns
            .iter()
            .map(|c| escape_csv(c))
            .collect::<Vec<_>>()
            .join(",");
        output.push('\n');

        for row in rows {
            let cells: Vec<String> = row.iter().map(format_value_csv).collect();
            output.push_str(&cells.join(","));
            output.push('\n');
        }

        output
    }

    fn format_names(&self, heading: &str, names: &[String]) -> String {
        let mut output = format!("{}\n", heading);
        for name in names {
            output.push_str(&format!("{}\n", escape_csv(name)));
        }
        output
    }

    fn format_metadata(&self, metadata: &TableMetadata) -> String {
        let mut output = String::from("column,type,nullable,primary_key\n");
        for column in &metadata.columns {
            output.push_str(&format!(
                "{},{},{},{}\n",
                escape_csv(&column.name),
                column.column_type,
                column.nullable,
                column.name == metadata.primary_key
            ));
        }
        output
    }

    fn format_mutation_result(&self, affected: usize, message: &str) -> String {
        format!("affected,message\n{},{}", affected, escape_csv(message))
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// Format a Value for CSV output. Nulls are empty cells.
fn format_value_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(s) => escape_csv(s),
        _ => value.to_string(),
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Convert a Value to JSON.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bivdb_core::row;

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "name".to_string()]
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_table_formatter_rows() {
        let out = TableFormatter.format_rows(&columns(), &[row![1, "Alice"], row![2, Value::Null]]);
        assert!(out.contains("Alice"));
        assert!(out.contains("NULL"));
        assert!(out.ends_with("2 row(s)"));
    }

    #[test]
    fn test_json_formatter_rows() {
        let out = JsonFormatter.format_rows(&columns(), &[row![1, Value::Null]]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([{ "id": 1, "name": null }]));
    }

    #[test]
    fn test_csv_formatter_rows() {
        let out = CsvFormatter.format_rows(
            &columns(),
            &[row![1, "Smith, J"], row![2, Value::Null], row![3, "say \"hi\""]],
        );
        assert_eq!(out, "id,name\n1,\"Smith, J\"\n2,\n3,\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_mutation_results() {
        assert_eq!(
            TableFormatter.format_mutation_result(2, "updated"),
            "2 row(s) affected: updated"
        );
        assert_eq!(
            JsonFormatter.format_mutation_result(0, ""),
            r#"{"affected":0,"message":""}"#
        );
        assert_eq!(
            CsvFormatter.format_mutation_result(1, "ok"),
            "affected,message\n1,ok"
        );
    }
}
