//! Optional deduplicated string pool for new-dialect tables
//!
//! A subset of columns may store string cells as indices into a shared pool
//! that lives after the content trunk. The pool area carries its own length
//! header, the member column list, and cumulative end offsets into a packed
//! region of NUL-terminated strings.

use std::collections::HashSet;

use crate::bintable::header::TableHeader;
use crate::bintable::reader::{Dialect, Reader};
use crate::error::{Error, Result};

/// Parsed string pool metadata
///
/// Membership is keyed by `column_index + 1` so that column 0 is
/// distinguishable from "not a member".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringPool {
    columns: HashSet<usize>,
    offsets: Vec<u64>,
    content_start: u64,
}

impl StringPool {
    /// Speculatively parse the pool area after the content trunk
    ///
    /// Returns `None` when the table has no pool: legacy dialect, empty
    /// content trunk, a non-positive head length, an out-of-bounds pool
    /// position, or any decode failure during the attempt. The fallback is
    /// silent by design, which also swallows genuinely corrupt pool data;
    /// direct string reads are used for every column in that case.
    pub fn detect(data: &[u8], header: &TableHeader, dialect: Dialect) -> Option<StringPool> {
        if dialect.is_legacy() || header.content_trunk_length <= 0 {
            return None;
        }
        let pool_position = 4i64
            + i64::from(header.info_length)
            + i64::from(header.primary_key_length)
            + i64::from(header.row_trunk_length)
            + i64::from(header.content_trunk_length);
        let pool_position = u64::try_from(pool_position).ok()?;
        Self::parse_at(data, pool_position).ok().flatten()
    }

    fn parse_at(data: &[u8], pool_position: u64) -> Result<Option<StringPool>> {
        let mut reader = Reader::new(data, Dialect::New);
        reader.seek(pool_position);

        let head_length = reader.read_i32()?;
        if head_length <= 0 {
            return Ok(None);
        }

        let pool_column_size = reader.read_int()?;
        let mut columns = HashSet::with_capacity(pool_column_size.max(0) as usize);
        for _ in 0..pool_column_size {
            let index = reader.read_int()?;
            let index = usize::try_from(index)
                .map_err(|_| Error::InvalidPool(format!("negative column index {}", index)))?;
            columns.insert(index + 1);
        }

        let string_pool_size = reader.read_int()?;
        let pool_column_len = reader.read_int()?;
        let pool_offset_trunk_len = reader.read_int()?;

        let content_start = pool_position as i64
            + i64::from(head_length)
            + 4
            + i64::from(pool_column_len)
            + i64::from(pool_offset_trunk_len);
        let content_start = u64::try_from(content_start)
            .map_err(|_| Error::InvalidPool(format!("negative content start {}", content_start)))?;

        // Cumulative exclusive end offsets; string i starts where i-1 ended
        let mut offsets = Vec::with_capacity(string_pool_size.max(0) as usize);
        for _ in 0..string_pool_size {
            let end = reader.read_int()?;
            let end = u64::try_from(end)
                .map_err(|_| Error::InvalidPool(format!("negative offset {}", end)))?;
            offsets.push(end);
        }

        Ok(Some(StringPool {
            columns,
            offsets,
            content_start,
        }))
    }

    /// Whether the column at `column_index` (0-based) reads its strings from
    /// the pool
    pub fn contains_column(&self, column_index: usize) -> bool {
        self.columns.contains(&(column_index + 1))
    }

    /// Number of strings in the pool
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Resolve pooled string `index`
    ///
    /// Runs a direct string read on a fresh sub-cursor, so the caller's
    /// cursor is untouched on every path, including errors.
    pub fn read_at(&self, data: &[u8], index: i32) -> Result<String> {
        let index = usize::try_from(index).map_err(|_| Error::PoolIndex {
            index: i64::from(index),
            size: self.offsets.len(),
        })?;
        if index >= self.offsets.len() {
            return Err(Error::PoolIndex {
                index: index as i64,
                size: self.offsets.len(),
            });
        }
        let start = if index == 0 { 0 } else { self.offsets[index - 1] };

        let mut reader = Reader::new(data, Dialect::New);
        reader.seek(self.content_start + start);
        reader.read_string_direct()
    }
}
