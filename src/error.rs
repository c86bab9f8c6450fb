//! Error types for the sales analytics pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SalesError>;

/// Errors that can occur while reading input or writing output.
///
/// Record-level problems never show up here: the parser and validator
/// discard bad rows and only count them.
#[derive(Error, Debug)]
pub enum SalesError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input file does not exist
    #[error("{} file is not found", path.display())]
    FileNotFound { path: PathBuf },

    /// None of the candidate encodings could decode the file
    #[error("{} could not be decoded (tried: {tried})", path.display())]
    Decode { path: PathBuf, tried: String },

    /// Encoding name not recognized
    #[error("unknown encoding '{0}' (expected utf-8, latin-1 or cp1252)")]
    UnknownEncoding(String),

    /// Region name is not one of North, South, East, West
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// Amount argument could not be read as a decimal
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}
