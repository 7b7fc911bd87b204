//! # untab
//!
//! A Rust library for decoding Punishing: Gray Raven binary data tables.
//!
//! ## Overview
//!
//! The game ships its data tables as `.tab.bytes` TextAssets in a compact,
//! self-describing columnar binary format. This library provides:
//!
//! - Parsing table headers, column schemas and primary-key metadata
//! - Decoding all fifteen column types (scalars, lists and dicts) with the
//!   format's LEB128-based integer encoding
//! - Both fixed-point decimal dialects (legacy string-based and the
//!   mantissa/shift encoding introduced with client 3.3.0)
//! - Transparent resolution of the optional deduplicated string pool
//! - A deterministic CSV projection of the decoded table
//!
//! ## Example - Decoding
//!
//! ```rust,no_run
//! use untab::{BinaryTable, Dialect};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("areastage.tab.bytes")?;
//!     let table = BinaryTable::parse(&data, Dialect::New)?;
//!
//!     println!("{} rows", table.row_count());
//!     for column in table.columns() {
//!         println!("{} ({})", column.name, column.kind);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Example - CSV conversion
//!
//! ```rust,no_run
//! use untab::{BinaryTable, Dialect};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("areastage.tab.bytes")?;
//!     let table = BinaryTable::parse(&data, Dialect::New)?;
//!
//!     let file = std::fs::File::create("areastage.csv")?;
//!     table.to_csv(file)?;
//!
//!     Ok(())
//! }
//! ```

pub mod bintable;
pub mod error;
pub mod utils;

pub use bintable::{BinaryTable, Column, ColumnType, Dialect, DictKey, TableHeader, Value};
pub use error::{Error, Result};
pub use utils::{collect_files, create_glob_matcher, format_size, is_table_file, matches_filter};
