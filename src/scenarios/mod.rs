//! The concrete analyses
//!
//! | analysis | source | summary | charts | reports |
//! |----------|--------|---------|--------|---------|
//! | [`supply_chain`] | synthetic, 50 rows | correlation matrix | heatmap (two sizes) | README from a template |
//! | [`workforce`] | embedded CSV | department frequency | bar, box | HTML |
//! | [`segments`] | synthetic segments | box statistics | box | - |
//! | [`journey`] | `data.csv` | grouped flow sums | alluvial | - |
//! | [`retention`] | four quarterly values | average, gap | line | - |
//! | [`notebook`] | reactive cells | correlation of generated data | - | Markdown |
//!
//! Every run writes a `manifest.json` listing its artifacts last.

pub mod journey;
pub mod notebook;
pub mod retention;
pub mod segments;
pub mod supply_chain;
pub mod workforce;

use crate::Result;
use chartflow_core::PipelineContext;
use chartflow_publish::{Artifact, OutputDir};
use chartflow_render::TextMode;

/// Footer line stamped on charts and reports
pub const WATERMARK: &str = "Generated with chartflow";

/// Configured text mode, or whatever the host's fonts allow
pub(crate) fn text_mode(configured: Option<TextMode>) -> TextMode {
    configured.unwrap_or_else(TextMode::detect)
}

/// Write the manifest, log the run summary and hand back the artifact list
pub(crate) fn finish(ctx: &PipelineContext, mut out: OutputDir) -> Result<Vec<Artifact>> {
    out.write_manifest(Some(&ctx.label()))?;
    ctx.finish();
    Ok(out.artifacts().to_vec())
}
