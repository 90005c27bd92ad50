//! Tables, data sources and pipeline plumbing for chartflow
//!
//! Every chartflow analysis is one linear run:
//!
//! 1. **Source** - a [`DataSource`] produces an immutable [`Table`]
//! 2. **Aggregate** - `chartflow-aggregate` reduces the table to summaries
//! 3. **Render** - `chartflow-render` draws summaries into fixed-size images
//! 4. **Publish** - `chartflow-publish` writes CSV, PNG and report files
//!
//! This crate holds what all stages share: the table model, the sources,
//! the error taxonomy, the run context and the reactive cell graph.
//!
//! # Example
//!
//! ```rust
//! use chartflow_core::{SyntheticColumn, SyntheticSpec, TableSource};
//!
//! let spec = SyntheticSpec::new(42, 50)
//!     .column(SyntheticColumn::normal("lead_time", 14.0, 5.0).clip(3.0, 30.0).decimals(1))
//!     .column(
//!         SyntheticColumn::derived("delivery", 95.0)
//!             .term("lead_time", -1.5)
//!             .noise(5.0)
//!             .clip(60.0, 100.0)
//!             .decimals(1),
//!     );
//!
//! let table = spec.load().unwrap();
//! assert_eq!(table.n_rows(), 50);
//! assert_eq!(table.to_csv_bytes().unwrap(), spec.load().unwrap().to_csv_bytes().unwrap());
//! ```

pub mod error;
pub mod numeric;
pub mod pipeline;
pub mod source;
pub mod synthetic;
pub mod table;

pub use error::{Error, Result};
pub use numeric::{format_number, linspace, round_to};
pub use pipeline::{Cell, CellGraph, CellValue, Inputs, MetaValue, Outputs, PipelineContext};
pub use source::{DataSource, FileSource, LiteralSource, TableSource};
pub use synthetic::{Generator, Segment, SegmentedSpec, SyntheticColumn, SyntheticSpec};
pub use table::{Column, ColumnKind, Field, Row, Scalar, Table, TableBuilder, ValueRange};

/// Commonly used items
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::{Cell, CellGraph, CellValue, Outputs, PipelineContext};
    pub use crate::source::{DataSource, FileSource, LiteralSource, TableSource};
    pub use crate::synthetic::{Segment, SegmentedSpec, SyntheticColumn, SyntheticSpec};
    pub use crate::table::{Column, Field, Table};
}
