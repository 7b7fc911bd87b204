//! Binary table parsing and the in-memory table model
//!
//! `BinaryTable::parse` runs the whole build in one pass: header parse,
//! speculative string-pool detection, then a sequential row scan. The result
//! is immutable; per-column statistics are settled before the table can be
//! observed, so CSV projection never sees partial state.

use std::io::Write;

use crate::bintable::csv;
use crate::bintable::header::{ColumnDef, TableHeader};
use crate::bintable::pool::StringPool;
use crate::bintable::reader::{Dialect, Reader};
use crate::bintable::value::{ColumnType, DictKey, Value};
use crate::error::{Error, Result};

/// A column with its schema definition and the statistics observed while
/// scanning all rows
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    /// Widest list (or int-keyed dict) seen in any row
    pub list_length: usize,
    /// Dict keys in first-seen order, deduplicated, union over all rows
    pub dict_keys: Vec<DictKey>,
}

/// Per-column statistics accumulated during the row scan
#[derive(Debug, Clone, Default)]
struct ColumnStats {
    list_length: usize,
    dict_keys: Vec<DictKey>,
}

impl ColumnStats {
    fn record(&mut self, kind: ColumnType, value: &Value) {
        match value {
            Value::List(items) => {
                if items.len() > self.list_length {
                    self.list_length = items.len();
                }
            }
            Value::Dict(pairs) => {
                if kind.is_int_keyed_dict() && pairs.len() > self.list_length {
                    self.list_length = pairs.len();
                }
                for (key, _) in pairs {
                    if !self.dict_keys.contains(key) {
                        self.dict_keys.push(key.clone());
                    }
                }
            }
            _ => {}
        }
    }
}

/// A fully decoded binary table
#[derive(Debug, Clone)]
pub struct BinaryTable {
    /// Parsed header metadata
    pub header: TableHeader,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    string_pool: Option<StringPool>,
}

impl BinaryTable {
    /// Parse a table from a fully-materialized buffer
    ///
    /// Construction is atomic: any cell failure aborts the whole build with
    /// the failing column name and row index attached.
    pub fn parse(data: &[u8], dialect: Dialect) -> Result<BinaryTable> {
        let mut reader = Reader::new(data, dialect);
        let header = TableHeader::parse(&mut reader)?;

        let string_pool = StringPool::detect(data, &header, dialect);
        if let Some(pool) = &string_pool {
            reader.set_pool(pool.clone());
        }

        reader.seek(u64::try_from(header.row_start()).unwrap_or(u64::MAX));
        let (rows, stats) = scan_rows(
            &mut reader,
            &header.columns,
            string_pool.as_ref(),
            header.row_count,
        )?;

        let columns = header
            .columns
            .iter()
            .zip(stats)
            .map(|(def, stats)| Column {
                name: def.name.clone(),
                kind: def.kind,
                list_length: stats.list_length,
                dict_keys: stats.dict_keys,
            })
            .collect();

        Ok(BinaryTable {
            header,
            columns,
            rows,
            string_pool,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.header.primary_key.as_deref()
    }

    pub fn has_string_pool(&self) -> bool {
        self.string_pool.is_some()
    }

    /// CSV header cells, expanded per column statistics
    pub fn csv_headers(&self) -> Vec<String> {
        csv::csv_headers(self)
    }

    /// Write the CSV projection: one header row, then every data row
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<()> {
        csv::write_csv(self, writer)
    }

    /// The CSV projection as an in-memory string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        csv::write_csv(self, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Scan `row_count` rows, decoding every cell in schema order
///
/// Pool mode is set per column before each cell decode. Returns the rows
/// together with the settled per-column statistics; the two only become
/// observable through the finished `BinaryTable`.
fn scan_rows(
    reader: &mut Reader,
    defs: &[ColumnDef],
    pool: Option<&StringPool>,
    row_count: i32,
) -> Result<(Vec<Vec<Value>>, Vec<ColumnStats>)> {
    let mut stats = vec![ColumnStats::default(); defs.len()];
    let mut rows = Vec::with_capacity(row_count.max(0) as usize);

    for row_index in 0..row_count {
        let mut row = Vec::with_capacity(defs.len());
        for (column_index, def) in defs.iter().enumerate() {
            reader.set_use_pool(pool.is_some_and(|p| p.contains_column(column_index)));
            let value = reader
                .read_value(def.kind)
                .map_err(|source| Error::CellDecode {
                    column: def.name.clone(),
                    row: row_index as usize,
                    source: Box::new(source),
                })?;
            stats[column_index].record(def.kind, &value);
            row.push(value);
        }
        rows.push(row);
    }

    Ok((rows, stats))
}
