//! Error types for chartflow-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Core(#[from] chartflow_core::Error),

    /// Column absent from the frame, or not of a kind the operation accepts
    #[error("Column '{0}' is missing or has the wrong type")]
    InvalidColumn(String),

    /// Only numeric and string columns map onto a table
    #[error("Column '{column}' has dtype {dtype}, which has no table equivalent")]
    UnsupportedDtype { column: String, dtype: String },
}

pub type Result<T> = std::result::Result<T, Error>;
