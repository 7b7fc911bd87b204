//! untab - a tool for decoding Punishing: Gray Raven binary tables
//!
//! Usage:
//!   untab <table_file>                 - Convert a table to CSV next to it
//!   untab convert <table_file>        - Convert a table to CSV
//!   untab info <table_file>           - Show table schema and metadata
//!   untab batch <dir> [filter]        - Convert every table under a directory

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use untab::bintable::utils::{convert_directory, convert_table};
use untab::Dialect;

#[derive(Parser)]
#[command(name = "untab")]
#[command(version = "0.1.0")]
#[command(about = "Decode Punishing: Gray Raven binary tables (.tab.bytes)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a .tab.bytes file (for quick convert mode)
    table_file: Option<PathBuf>,

    /// Decode with the legacy (pre-3.3.0) table dialect
    #[arg(long)]
    legacy: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a table to CSV
    Convert {
        /// Path to the .tab.bytes file
        table_file: PathBuf,
        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Decode with the legacy (pre-3.3.0) table dialect
        #[arg(long)]
        legacy: bool,
    },
    /// Show table schema and metadata
    Info {
        /// Path to the .tab.bytes file
        table_file: PathBuf,
        /// Decode with the legacy (pre-3.3.0) table dialect
        #[arg(long)]
        legacy: bool,
    },
    /// Convert every table under a directory
    Batch {
        /// Directory containing .tab.bytes files
        dir: PathBuf,
        /// Filter pattern (e.g., *stage*, Share/*)
        filter: Option<String>,
        /// Output directory (defaults to writing next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Decode with the legacy (pre-3.3.0) table dialect
        #[arg(long)]
        legacy: bool,
    },
}

fn dialect_for(legacy: bool) -> Dialect {
    if legacy {
        Dialect::Legacy
    } else {
        Dialect::New
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            table_file,
            output,
            legacy,
        }) => convert_table(&table_file, output.as_deref(), dialect_for(legacy), false),
        Some(Commands::Info { table_file, legacy }) => {
            convert_table(&table_file, None, dialect_for(legacy), true)
        }
        Some(Commands::Batch {
            dir,
            filter,
            output,
            legacy,
        }) => convert_directory(
            &dir,
            filter.as_deref(),
            output.as_deref(),
            dialect_for(legacy),
        ),
        None => match cli.table_file {
            // Quick mode: convert in place
            Some(table_file) => {
                convert_table(&table_file, None, dialect_for(cli.legacy), false)
            }
            None => {
                eprintln!("Usage: untab <table_file>  (see --help for subcommands)");
                std::process::exit(1);
            }
        },
    }
}
