//! bivdb command-line client.

use std::path::PathBuf;

use bivdb_cli::config::DEFAULT_DATA_DIR;
use bivdb_cli::{execute, CliConfig, Command, OutputFormat};
use bivdb_core::DatabaseConfig;
use clap::Parser;

/// bivdb command-line client
#[derive(Parser, Debug)]
#[command(name = "bivdb")]
#[command(version, about = "Manage bivdb tables stored as JSON files")]
pub struct Args {
    /// Directory holding one sub-directory per database
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Apply updates without re-checking types and foreign keys
    #[arg(long)]
    pub unchecked_updates: bool,

    #[command(subcommand)]
    pub command: Command,
}

fn main() {
    // Logs go to stderr so stdout stays parseable in json/csv mode.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bivdb_cli=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let config = CliConfig::new(args.data_dir)
        .with_format(args.format)
        .with_database_config(DatabaseConfig::new().validate_updates(!args.unchecked_updates));
    let store = config.store();

    match execute(&args.command, &config, &store) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
