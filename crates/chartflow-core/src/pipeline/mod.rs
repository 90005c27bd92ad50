//! Pipeline plumbing shared by every analysis
//!
//! [`PipelineContext`] times and logs the linear stages of one run;
//! [`CellGraph`] is the reactive variant where named cells re-run when an
//! upstream input changes.

pub mod cells;
pub mod context;

pub use cells::{Cell, CellGraph, CellGraphBuilder, CellValue, Inputs, Outputs};
pub use context::{MetaValue, PipelineContext};
