//! Error handling for keyword extraction and dataset I/O.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while loading, transforming or saving a dataset
#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    /// Error opening, reading or writing a file
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting between Rust records and Arrow batches
    #[error("Record conversion error: {0}")]
    Records(#[from] serde_arrow::Error),

    /// No data files were found for a requested split
    #[error("No data files for split '{split}' in {}", .dir.display())]
    SplitNotFound { split: String, dir: PathBuf },

    /// A named column does not exist
    #[error("Column '{column}' not found in split '{split}'")]
    ColumnNotFound { column: String, split: String },

    /// A text column has a type that cannot hold text
    #[error("Column '{column}' has type {data_type}, expected a string column")]
    InvalidColumnType { column: String, data_type: DataType },

    /// Files of one split disagree on their schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The keyword model failed
    #[error("Keyword extraction error: {0}")]
    Extraction(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeywordError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for keyword pipeline operations
pub type Result<T> = std::result::Result<T, KeywordError>;
