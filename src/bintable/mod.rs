//! Binary table format parser
//!
//! Punishing: Gray Raven ships its game data tables as `.tab.bytes`
//! TextAssets: a compact, self-describing columnar record format. This
//! module decodes it and projects the result to CSV.
//!
//! ## Format Overview
//!
//! A table consists of:
//! - A 4-byte info length followed by the schema: column types and names,
//!   primary-key metadata, trunk lengths and the row count
//! - A row data area of LEB128-based cells, `row_count` rows in schema order
//! - In the new dialect, an optional string pool area after the content
//!   trunk, holding deduplicated strings referenced by index from a subset
//!   of columns
//!
//! Two dialects exist: clients before 3.3.0 use string-based fixed-point
//! decimals and name-based primary-key references; newer clients use
//! mantissa/shift decimals, index-based primary-key references and the
//! string pool. The dialect is supplied by the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use untab::bintable::{BinaryTable, Dialect};
//!
//! let data = std::fs::read("areastage.tab.bytes")?;
//! let table = BinaryTable::parse(&data, Dialect::New)?;
//!
//! for column in table.columns() {
//!     println!("{} ({})", column.name, column.kind);
//! }
//!
//! let mut out = Vec::new();
//! table.to_csv(&mut out)?;
//! # Ok::<(), untab::Error>(())
//! ```

mod csv;
mod header;
mod pool;
mod reader;
mod table;
pub mod utils;
mod value;

pub use header::{ColumnDef, TableHeader};
pub use pool::StringPool;
pub use reader::{Dialect, Reader};
pub use table::{BinaryTable, Column};
pub use utils::{convert_directory, convert_table, show_table_info};
pub use value::{ColumnType, DictKey, Value};
