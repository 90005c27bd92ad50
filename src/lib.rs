//! # chartflow
//!
//! Small single-run analyses over tabular data. Each run synthesizes or
//! loads a [`Table`](core::Table), reduces it with the aggregators, draws
//! fixed-size charts and writes CSV, PNG and report files into one output
//! directory.
//!
//! ## Crates
//!
//! - [`core`] - table model, data sources, pipeline context, reactive cells
//! - [`aggregate`] - correlation, frequency, grouped sums, box statistics
//! - [`render`] - heatmap, bar, box, flow and line charts
//! - [`publish`] - output directory, reports, templates, manifest
//! - `polars` (feature `polars`) - `DataFrame` interop
//!
//! ## Analyses
//!
//! The [`scenarios`] module holds the six concrete analyses; each has a
//! `Config` with the fixed constants as its `Default` and a `run` function.
//!
//! ```rust,no_run
//! use chartflow::scenarios::retention;
//!
//! let outcome = retention::run(&retention::Config::default(), "output/retention".as_ref())?;
//! assert_eq!(outcome.average, 74.06);
//! # Ok::<(), chartflow::Error>(())
//! ```

pub mod error;
pub mod scenarios;

pub use error::{Error, Result};

pub use chartflow_aggregate as aggregate;
pub use chartflow_core as core;
pub use chartflow_publish as publish;
pub use chartflow_render as render;

#[cfg(feature = "polars")]
pub use chartflow_polars as polars;

use tracing_subscriber::EnvFilter;

/// Install the `fmt` subscriber; `RUST_LOG` overrides the default `info` level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
