//! Error types for chartflow
//!
//! Provides the error taxonomy shared by every chartflow crate. Renderer and
//! publisher crates wrap this type in their own enums.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type for table loading, aggregation and pipeline plumbing
#[derive(Error, Debug)]
pub enum Error {
    /// Source file or path does not exist
    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Embedded literal table could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed rows or missing/mistyped expected columns
    #[error("Format error: {0}")]
    Format(String),

    /// A statistic is undefined for the given input (e.g. zero variance)
    #[error("Computation undefined: {0}")]
    ComputationUndefined(String),

    /// Not enough rows for the requested operation
    #[error("Insufficient data: expected at least {expected} rows, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reactive cell graph is malformed or was asked for an unknown binding
    #[error("Cell graph error: {0}")]
    Graph(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a missing input file
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::InputNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an error for a column that is absent from a table
    pub fn missing_column(name: &str) -> Self {
        Self::Format(format!("missing expected column '{name}'"))
    }

    /// Create an error for a column of the wrong kind
    pub fn column_kind(name: &str, expected: &str) -> Self {
        Self::Format(format!("column '{name}' is not {expected}"))
    }

    /// Create an error for a ragged row
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::Format(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a zero-variance column in a correlation
    pub fn zero_variance(column: &str) -> Self {
        Self::ComputationUndefined(format!(
            "correlation against zero-variance column '{column}'"
        ))
    }
}
