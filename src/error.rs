//! Error types for the analytics engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, filtering, or aggregating sales data.
#[derive(Debug, Error)]
pub enum Error {
    /// The data source does not exist or could not be opened.
    #[error("sales data not found at {}: {source}", path.display())]
    MissingData {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source exists but a row or column is malformed. Fatal: the
    /// loader never skips rows.
    #[error("malformed sales data: {0}")]
    Schema(String),

    /// A mean was requested over a selection with no rows.
    #[error("cannot compute a mean over an empty selection")]
    EmptyGroup,

    /// A filter bound supplied by the caller could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// CSV serialization failed while exporting a view.
    #[error("export error: {0}")]
    Export(#[from] csv::Error),
}

impl Error {
    /// Schema error pinned to a 1-based data row number.
    pub fn schema_at(row: usize, message: impl Into<String>) -> Self {
        Self::Schema(format!("row {row}: {}", message.into()))
    }
}
