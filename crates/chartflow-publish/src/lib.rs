//! Publishing for chartflow runs
//!
//! An [`OutputDir`] writes tables as CSV, charts as PNG and reports as HTML
//! or Markdown, and records every file as an [`Artifact`] for the run's
//! `manifest.json`. Reports are built as a [`ReportDocument`]; free-form
//! text goes through a [`Template`] with `{{name}}` placeholders, rendered
//! by handlebars in strict mode.
//!
//! ```rust
//! use chartflow_publish::{Template, TemplateValues};
//!
//! let text = Template::new("Average retention: {{avg}}%")
//!     .render(&TemplateValues::new().set("avg", "74.06"))
//!     .unwrap();
//! assert_eq!(text, "Average retention: 74.06%");
//! ```

pub mod error;
pub mod output;
pub mod report;
pub mod template;

pub use error::{Error, Result};
pub use output::{Artifact, ArtifactKind, OutputDir, ReportFormat, MANIFEST};
pub use report::{Block, ImageSource, ReportDocument};
pub use template::{Template, TemplateValues};
