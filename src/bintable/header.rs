//! Table header and column schema parsing

use crate::bintable::reader::Reader;
use crate::bintable::value::ColumnType;
use crate::error::{Error, Result};

/// One column definition from the table schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnType,
}

/// Parsed table header: schema, primary-key metadata and trunk lengths
///
/// The trunk lengths are never interpreted, only honored to locate the row
/// data and pool areas.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    pub info_length: i32,
    pub columns: Vec<ColumnDef>,
    pub has_primary_key: bool,
    pub primary_key: Option<String>,
    pub primary_key_length: i32,
    pub row_trunk_length: i32,
    pub row_count: i32,
    pub content_trunk_length: i32,
}

impl TableHeader {
    /// Decode the header in wire order
    ///
    /// The primary-key reference is a literal name string in the legacy
    /// dialect and an index into the already-parsed column list in the new
    /// dialect. Hitting end-of-buffer on the final `content_trunk_length`
    /// field defines a zero-row table rather than an error.
    pub fn parse(reader: &mut Reader) -> Result<TableHeader> {
        let info_length = reader.read_i32()?;

        let column_count = reader.read_int()?;
        let mut columns = Vec::with_capacity(column_count.max(0) as usize);
        for _ in 0..column_count {
            let code = reader.read_int()?;
            let name = reader.read_string()?;
            columns.push(ColumnDef {
                name,
                kind: ColumnType::from_code(code)?,
            });
        }

        let has_primary_key = reader.read_bool()?;
        let mut primary_key = None;
        let mut primary_key_length = 0;
        if has_primary_key {
            let name = if reader.dialect().is_legacy() {
                reader.read_string()?
            } else {
                let index = reader.read_int()?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| columns.get(i))
                    .map(|column| column.name.clone())
                    .unwrap_or_default()
            };
            primary_key = Some(name);
            primary_key_length = reader.read_int()?;
        }

        let row_trunk_length = reader.read_int()?;
        let mut row_count = reader.read_int()?;
        let content_trunk_length = match reader.read_int() {
            Ok(length) => length,
            Err(Error::UnexpectedEof(_)) => {
                row_count = 0;
                0
            }
            Err(e) => return Err(e),
        };

        Ok(TableHeader {
            info_length,
            columns,
            has_primary_key,
            primary_key,
            primary_key_length,
            row_trunk_length,
            row_count,
            content_trunk_length,
        })
    }

    /// Absolute offset of the first row cell
    pub fn row_start(&self) -> i64 {
        4 + i64::from(self.info_length)
            + i64::from(self.primary_key_length)
            + i64::from(self.row_trunk_length)
    }
}
