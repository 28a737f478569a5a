//! @ai:module:intent Define error types for table loading and metric computation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all epitrack library operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing expected column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Column header '{header}' is not a date in format '{format}'")]
    InvalidDate { header: String, format: String },

    #[error("Date axis is not strictly increasing at {date}")]
    UnorderedDates { date: String },

    #[error("Invalid count '{value}' in column '{column}' of row {row}")]
    InvalidCount {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row '{country}' has {actual} values, expected {expected}")]
    RowLength {
        country: String,
        expected: usize,
        actual: usize,
    },

    #[error("Count for '{country}' on {date} overflows")]
    CountOverflow { country: String, date: String },

    #[error("Tables are not aligned: {0}")]
    Misaligned(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No {metric} time series found under {dir}")]
    MissingSource { metric: String, dir: PathBuf },

    #[error("Several {metric} time series found under {dir}: {candidates:?}")]
    AmbiguousSource {
        metric: String,
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
