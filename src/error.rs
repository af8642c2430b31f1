//! Error types for catalog loading and reporting

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Source file missing or unreadable, or report could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column the catalog depends on is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
