//! Fixed-size static charts for chartflow
//!
//! Every chart implements [`Chart`] and is turned into an RGB image of
//! exactly the declared size by [`render`]:
//!
//! - [`Heatmap`] - annotated correlation matrix on a diverging scale
//! - [`BarChart`] - category counts with an optional highlighted bar
//! - [`BoxPlot`] - per-category distributions
//! - [`FlowDiagram`] - alluvial flows across categorical dimensions
//! - [`LineChart`] - a labelled trend with reference lines
//!
//! Drawing happens on an in-memory `plotters` bitmap at the native canvas
//! size; a [`FitPlan`] then brings it to the declared size. Text needs a
//! font, so a [`ChartSpec`] carries a [`TextMode`]: `Suppressed` draws
//! geometry only.
//!
//! # Example
//!
//! ```rust
//! use chartflow_render::{render, BarChart, ChartKind, ChartSpec};
//!
//! let chart = BarChart::new(vec![("IT".to_string(), 12.0), ("Sales".to_string(), 7.0)])
//!     .with_highlight("Sales");
//! let image = render(&ChartSpec::square(ChartKind::Bar, 128), &chart).unwrap();
//! assert_eq!(image.dimensions(), (128, 128));
//! ```

pub mod bar;
pub mod boxplot;
pub mod chart;
pub mod color;
pub mod error;
pub mod fit;
pub mod flow;
pub mod fonts;
pub mod heatmap;
pub mod layout;
pub mod line;
pub mod spec;

pub use bar::{BarChart, BarStyle};
pub use boxplot::{BoxPlot, BoxStyle};
pub use chart::{render, Chart, RenderedImage};
pub use color::{hue_palette, parse_hex, CategoryColors, DivergingScale};
pub use error::{Error, Result};
pub use fit::FitPlan;
pub use flow::{FlowColoring, FlowDiagram, FlowDimension, FlowHop, FlowLink};
pub use heatmap::{Heatmap, HeatmapStyle};
pub use layout::{DashPattern, FlowWeight};
pub use line::{LegendPosition, LineChart, LineStyle, ReferenceLine};
pub use spec::{ChartKind, ChartSpec, TextMode};

// Colour type used by every style struct
pub use plotters::style::RGBColor;
