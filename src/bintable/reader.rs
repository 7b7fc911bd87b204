//! Primitive decoders for the binary table format
//!
//! The `Reader` owns a cursor over an in-memory byte buffer and is scoped to
//! exactly one table build. All multi-byte integers are little-endian; most
//! scalars ride on an unsigned LEB128 base encoding.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use rust_decimal::Decimal;

use crate::bintable::pool::StringPool;
use crate::bintable::value::{ColumnType, DictKey, Value};
use crate::error::{Error, Result};

/// Signed 32-bit ceiling used by the LEB128 fold
const MAX_I32: u64 = 0x7FFF_FFFF;

/// Fixed scale divisor for float cells (always 4 decimal digits)
const FLOAT_TO_INT: f64 = 10_000.0;

/// Format dialect, selected once per table by the caller
///
/// The game switched header/fixnum/pool layout with client 3.3.0; the flag
/// is supplied externally because the table data itself does not carry a
/// version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Pre-3.3.0: string-based fixnums, primary key referenced by name, no
    /// string pool
    Legacy,
    /// 3.3.0 onwards: mantissa/shift fixnums, primary key referenced by
    /// column index, optional string pool
    New,
}

impl Dialect {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Dialect::Legacy)
    }
}

/// Cursor-owning primitive decoder for one table build
pub struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    dialect: Dialect,
    pool: Option<StringPool>,
    use_pool: bool,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], dialect: Dialect) -> Reader<'a> {
        Reader {
            cursor: Cursor::new(data),
            dialect,
            pool: None,
            use_pool: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn seek(&mut self, position: u64) {
        self.cursor.set_position(position);
    }

    /// Attach the table's string pool for pooled string resolution
    pub(crate) fn set_pool(&mut self, pool: StringPool) {
        self.pool = Some(pool);
    }

    /// Toggle pool mode for the next cell; decided per column before each
    /// cell decode, never per row
    pub(crate) fn set_use_pool(&mut self, use_pool: bool) {
        self.use_pool = use_pool;
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let position = self.position();
        self.cursor
            .read_u8()
            .map_err(|_| Error::UnexpectedEof(position))
    }

    pub fn read_bytes(&mut self, size: usize) -> Result<Vec<u8>> {
        let position = self.position();
        let mut buffer = vec![0u8; size];
        self.cursor
            .read_exact(&mut buffer)
            .map_err(|_| Error::UnexpectedEof(position))?;
        Ok(buffer)
    }

    /// 4-byte little-endian signed integer (info and pool head lengths)
    pub fn read_i32(&mut self) -> Result<i32> {
        let position = self.position();
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| Error::UnexpectedEof(position))
    }

    /// Unsigned LEB128: 7 data bits per byte low-to-high, 0x80 continuation
    ///
    /// Accumulation is not width-capped; data bits past the accumulator are
    /// discarded while continuation bytes are still consumed.
    pub fn read_leb128(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift < u64::BITS {
                result |= u64::from(byte & 0x7F) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(result)
    }

    /// LEB128 folded into signed 32-bit range
    ///
    /// The wire stores the bit pattern of a signed 32-bit integer as if it
    /// were unsigned LEB128; this is a manual two's-complement fold, not
    /// zig-zag.
    pub fn read_int(&mut self) -> Result<i32> {
        let x = self.read_leb128()?;
        if x > MAX_I32 {
            let magnitude = ((!x) & MAX_I32) + 1;
            Ok(-(magnitude as i64) as i32)
        } else {
            Ok(x as i32)
        }
    }

    /// One byte; true iff it equals 1 (any other value is false, not an
    /// error)
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? == 1)
    }

    /// A string cell: pooled index when pool mode is on, otherwise a
    /// NUL-terminated UTF-8 run
    pub fn read_string(&mut self) -> Result<String> {
        if self.use_pool {
            let index = self.read_int()?;
            return match &self.pool {
                Some(pool) => pool.read_at(*self.cursor.get_ref(), index),
                None => Ok(String::new()),
            };
        }
        self.read_string_direct()
    }

    /// Bytes up to a 0x00 terminator (exclusive), decoded as UTF-8
    ///
    /// A lone terminator yields the empty string. Pool resolution uses this
    /// on a fresh sub-cursor so it can never recurse into the pool.
    pub(crate) fn read_string_direct(&mut self) -> Result<String> {
        let mut chars = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            chars.push(byte);
        }
        Ok(String::from_utf8(chars)?)
    }

    /// Fixed-point decimal cell, wire shape depending on the dialect
    ///
    /// Legacy: same wire shape as a direct string; empty means zero,
    /// anything else parses as an exact base-10 decimal. New: LEB128
    /// mantissa (zero means zero with nothing further consumed), then one
    /// shift byte carrying the sign in bit 7 and the base-10 exponent in the
    /// low 7 bits.
    pub fn read_fix(&mut self) -> Result<Decimal> {
        if self.dialect.is_legacy() {
            let text = self.read_string()?;
            if text.is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str_exact(&text)
                .map_err(|e| Error::InvalidDecimal(format!("{}: {}", text, e)));
        }

        let mantissa = self.read_leb128()?;
        if mantissa == 0 {
            return Ok(Decimal::ZERO);
        }
        let shift = self.read_u8()?;
        let flip_sign = shift & 0x80 != 0;
        let scale = u32::from(shift & 0x7F);
        let num = Decimal::try_from_i128_with_scale(i128::from(mantissa), scale)
            .map_err(|e| Error::InvalidDecimal(format!("{}e-{}: {}", mantissa, scale, e)))?;
        Ok(if flip_sign { -num } else { num })
    }

    /// Float cell: a folded int scaled down by 10000
    pub fn read_float(&mut self) -> Result<f64> {
        let x = self.read_int()?;
        if x == 0 {
            return Ok(0.0);
        }
        Ok(f64::from(x) / FLOAT_TO_INT)
    }

    /// Decode one cell of the given column type
    pub fn read_value(&mut self, kind: ColumnType) -> Result<Value> {
        match kind {
            ColumnType::Bool => self.read_bool().map(Value::Bool),
            ColumnType::String => self.read_string().map(Value::Str),
            ColumnType::Fix => self.read_fix().map(Value::Fix),
            ColumnType::StringList => self.read_list(|r| r.read_string().map(Value::Str)),
            ColumnType::BoolList => self.read_list(|r| r.read_bool().map(Value::Bool)),
            ColumnType::IntList => self.read_list(|r| r.read_int().map(Value::Int)),
            ColumnType::FloatList => self.read_list(|r| r.read_float().map(Value::Float)),
            ColumnType::FixList => self.read_list(|r| r.read_fix().map(Value::Fix)),
            ColumnType::StringStringDict => self.read_dict(
                |r| r.read_string().map(DictKey::Str),
                |r| r.read_string().map(Value::Str),
            ),
            ColumnType::IntIntDict => self.read_dict(
                |r| r.read_int().map(DictKey::Int),
                |r| r.read_int().map(Value::Int),
            ),
            ColumnType::IntStringDict => self.read_dict(
                |r| r.read_int().map(DictKey::Int),
                |r| r.read_string().map(Value::Str),
            ),
            ColumnType::StringIntDict => self.read_dict(
                |r| r.read_string().map(DictKey::Str),
                |r| r.read_int().map(Value::Int),
            ),
            ColumnType::IntFloatDict => self.read_dict(
                |r| r.read_int().map(DictKey::Int),
                |r| r.read_float().map(Value::Float),
            ),
            ColumnType::Int => self.read_int().map(Value::Int),
            ColumnType::Float => self.read_float().map(Value::Float),
        }
    }

    /// Count-prefixed list; a negative count behaves as zero
    fn read_list(&mut self, element: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        let count = self.read_int()?;
        let mut items = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            items.push(element(self)?);
        }
        Ok(Value::List(items))
    }

    /// Count-prefixed dict, key before value in each pair
    fn read_dict(
        &mut self,
        key: fn(&mut Self) -> Result<DictKey>,
        value: fn(&mut Self) -> Result<Value>,
    ) -> Result<Value> {
        let count = self.read_int()?;
        let mut pairs: Vec<(DictKey, Value)> = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            let k = key(self)?;
            let v = value(self)?;
            match pairs.iter_mut().find(|(existing, _)| *existing == k) {
                Some(pair) => pair.1 = v,
                None => pairs.push((k, v)),
            }
        }
        Ok(Value::Dict(pairs))
    }
}
