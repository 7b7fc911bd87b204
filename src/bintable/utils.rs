//! Binary table conversion helpers
//!
//! This module contains functions for converting `.tab.bytes` files to CSV.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::utils::{collect_files, create_glob_matcher, format_size, is_table_file, matches_filter};
use super::{BinaryTable, Dialect};

/// Convert a single table file to CSV
///
/// The output path defaults to the input with the `.tab.bytes` suffix
/// replaced by `.csv`. With `info_only`, the table is parsed and described
/// but nothing is written.
pub fn convert_table(
    table_path: &Path,
    output: Option<&Path>,
    dialect: Dialect,
    info_only: bool,
) -> Result<()> {
    let data = fs::read(table_path)
        .with_context(|| format!("Failed to read {}", table_path.display()))?;
    println!(
        "Loading table: {} ({})",
        table_path.display(),
        format_size(data.len() as u64)
    );

    let table = BinaryTable::parse(&data, dialect)
        .with_context(|| format!("Failed to parse {}", table_path.display()))?;

    show_table_info(&table);

    if info_only {
        return Ok(());
    }

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| csv_path_for(table_path));

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    table
        .to_csv(file)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "\nSaved {} rows to {}",
        table.row_count(),
        output_path.display()
    );

    Ok(())
}

/// Display table schema and metadata
pub fn show_table_info(table: &BinaryTable) {
    println!("\nTable Info:");
    println!("  Columns: {}", table.columns().len());
    println!("  Rows: {}", table.row_count());
    match table.primary_key() {
        Some(key) => println!("  Primary key: {}", key),
        None => println!("  Primary key: none"),
    }
    println!(
        "  String pool: {}",
        if table.has_string_pool() { "yes" } else { "no" }
    );
    println!("  Row trunk: {} bytes", table.header.row_trunk_length);
    println!(
        "  Content trunk: {} bytes",
        table.header.content_trunk_length
    );

    println!("\nSchema:");
    for column in table.columns() {
        println!("  {} ({})", column.name, column.kind);
    }
}

/// Convert every table file under a directory
///
/// Output files mirror the input directory structure under `output` (or sit
/// next to their inputs when no output directory is given). Files that fail
/// to parse are reported and skipped.
pub fn convert_directory(
    dir: &Path,
    filter: Option<&str>,
    output: Option<&Path>,
    dialect: Dialect,
) -> Result<()> {
    let matcher = filter.map(create_glob_matcher).transpose()?;

    let tables: Vec<PathBuf> = collect_files(dir)?
        .into_iter()
        .filter(|path| is_table_file(path))
        .filter(|path| matches_filter(&path.to_string_lossy(), matcher.as_ref()))
        .collect();

    if tables.is_empty() {
        println!("No table files found in {}", dir.display());
        return Ok(());
    }

    println!("Converting {} tables...", tables.len());
    let pb = ProgressBar::new(tables.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut success = 0u64;

    for table_path in &tables {
        pb.inc(1);

        let destination = match output {
            Some(out) => {
                let relative = table_path.strip_prefix(dir).unwrap_or(table_path);
                let destination = out.join(csv_path_for(relative));
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                destination
            }
            None => csv_path_for(table_path),
        };

        let result = fs::read(table_path)
            .map_err(anyhow::Error::from)
            .and_then(|data| {
                let table = BinaryTable::parse(&data, dialect)?;
                let file = File::create(&destination)?;
                table.to_csv(file)?;
                Ok(())
            });

        match result {
            Ok(()) => success += 1,
            Err(e) => {
                pb.suspend(|| {
                    eprintln!("Warning: {}: {}", table_path.display(), e);
                });
            }
        }
    }

    pb.finish_with_message("Done");
    println!("\nConverted {}/{} tables", success, tables.len());

    Ok(())
}

/// Derive the CSV output path from a table path
///
/// `areastage.tab.bytes` becomes `areastage.csv`.
fn csv_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("table");
    let stem = name
        .strip_suffix(".tab.bytes")
        .or_else(|| name.strip_suffix(".bytes"))
        .or_else(|| name.strip_suffix(".tab"))
        .unwrap_or(name);
    path.with_file_name(format!("{}.csv", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_path_for() {
        assert_eq!(
            csv_path_for(Path::new("data/areastage.tab.bytes")),
            Path::new("data/areastage.csv")
        );
        assert_eq!(
            csv_path_for(Path::new("npcsearcher.bytes")),
            Path::new("npcsearcher.csv")
        );
        assert_eq!(
            csv_path_for(Path::new("plain.tab")),
            Path::new("plain.csv")
        );
        assert_eq!(
            csv_path_for(Path::new("noext")),
            Path::new("noext.csv")
        );
    }
}
