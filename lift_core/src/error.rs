//! Errors raised while reading training data and settings.
//!
//! Only loading can fail: record files, catalogs, schedules and the config
//! file. Analyzers take already-loaded data and always return a result, so
//! nothing below the engine returns this type.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings that failed validation or could not be written
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog with missing ids, empty category lists or duplicate names
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A record row whose fields cannot be turned into a workout record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// No record file at the expected location
    #[error("No workout records at {}", .0.display())]
    MissingRecords(PathBuf),

    /// File extension or layout that no loader understands
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}
