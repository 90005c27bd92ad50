//! Polars integration for chartflow
//!
//! Converts between chartflow [`Table`](chartflow_core::Table)s and Polars
//! `DataFrame`s and runs the chartflow aggregations directly on a frame
//! through a single extension trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use chartflow_polars::{ChartflowFrameExt, CategoryOrder};
//!
//! let df = df!["department" => ["IT", "Marketing", "IT"]]?;
//! let counts = df.frequency("department", &CategoryOrder::ByCount)?;
//! ```

mod convert;
mod error;
mod traits;

pub use convert::{from_data_frame, to_data_frame};
pub use error::{Error, Result};
pub use traits::*;

// Re-export the aggregation options used by the trait
pub use chartflow_aggregate::{CategoryOrder, ZeroVariancePolicy};
