//! Error types for untab

use thiserror::Error;

/// Main error type for untab operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of data at offset {0}")]
    UnexpectedEof(u64),

    #[error("Unknown column type: {0}")]
    UnknownColumnType(i32),

    #[error("Invalid UTF-8 in string data: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid string pool: {0}")]
    InvalidPool(String),

    #[error("String pool index {index} out of range (pool has {size} strings)")]
    PoolIndex { index: i64, size: usize },

    #[error("Error decoding column {column} at row {row}: {source}")]
    CellDecode {
        column: String,
        row: usize,
        source: Box<Error>,
    },

    #[error("Cannot serialize dict value to CSV")]
    CannotSerializeDict,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for untab operations
pub type Result<T> = std::result::Result<T, Error>;
