//! Error types for parity-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in parity-core
///
/// Only input and configuration problems surface here. Disagreements between
/// the two logs, including unparsable numeric cells, are reported as field
/// diffs in the comparison report instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Invalid comparison configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration problems, all fatal before any row is compared
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No alignment key columns were configured
    #[error("at least one key column is required")]
    EmptyKeyColumns,

    /// A tolerance was below zero
    #[error("{class} tolerance must be non-negative, got {value}")]
    NegativeTolerance { class: String, value: f64 },

    /// A tolerance was NaN or infinite
    #[error("{class} tolerance must be a finite number")]
    NonFiniteTolerance { class: String },

    /// A column class override named a class that does not exist
    #[error("unknown column class '{class}' for column '{column}'")]
    UnknownColumnClass { column: String, class: String },

    /// A key column is not present in one of the log headers
    #[error("key column '{column}' is missing from the {side} header")]
    KeyColumnMissing { column: String, side: String },
}
