//! Aggregation of chartflow tables into summary results
//!
//! Every function here takes an immutable [`Table`](chartflow_core::Table)
//! and returns a new value:
//!
//! - [`correlation_matrix`] - pairwise Pearson coefficients with an explicit
//!   [`ZeroVariancePolicy`]
//! - [`frequency`] - counts per category in a [`CategoryOrder`]
//! - [`grouped_sum`] - summed volume per key tuple
//! - [`describe`], [`box_stats`], [`group_means`] - descriptive statistics
//!
//! # Example
//!
//! ```rust
//! use chartflow_aggregate::{frequency, CategoryOrder};
//! use chartflow_core::Table;
//!
//! let table = Table::builder()
//!     .categorical("department", vec!["IT", "Marketing", "IT"])
//!     .build()
//!     .unwrap();
//! let counts = frequency(&table, "department", &CategoryOrder::ByCount).unwrap();
//! assert_eq!(counts.count("IT"), 2);
//! assert_eq!(format!("{:.1}%", counts.share("Marketing")), "33.3%");
//! ```

pub mod correlation;
pub mod describe;
pub mod frequency;
pub mod grouped;
pub mod summary;

pub use correlation::{
    correlation_matrix, pearson, CorrelationMatrix, CorrelationPair, Direction, Strength,
    ZeroVariancePolicy,
};
pub use describe::{
    arg_max, box_stats, describe, group_means, mean, population_std_dev, quantile, BoxStats,
};
pub use frequency::{frequency, CategoryOrder, FrequencyTable};
pub use grouped::{grouped_sum, GroupedSum};
pub use summary::SummaryResult;

// Rounding lives with the table model; re-exported for report scalars
pub use chartflow_core::numeric::round_to;
