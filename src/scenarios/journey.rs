//! Customer journeys from channel through stage to outcome as an alluvial diagram

use super::{finish, text_mode, WATERMARK};
use crate::Result;
use chartflow_aggregate::{grouped_sum, GroupedSum, SummaryResult};
use chartflow_core::{FileSource, PipelineContext, TableSource};
use chartflow_publish::{Artifact, OutputDir};
use chartflow_render::{
    parse_hex, render, CategoryColors, ChartKind, ChartSpec, FlowColoring, FlowDiagram, TextMode,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const TITLE: &str = "Customer Journey Flow\nAlluvial Diagram";
pub const DIMENSIONS: [&str; 3] = ["Channel", "Stage", "Outcome"];
pub const VOLUME: &str = "Count";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CSV with `Channel,Stage,Outcome,Count`
    pub input: PathBuf,
    pub channel_colors: Vec<(String, String)>,
    pub stage_colors: Vec<(String, String)>,
    /// Stage colour for stages not listed in `stage_colors`
    pub stage_fallback: String,
    pub outcome_colors: Vec<(String, String)>,
    /// Canvas the diagram is drawn on before resizing
    pub native: u32,
    pub size: u32,
    pub text: Option<TextMode>,
    pub watermark: String,
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/journey/data.csv"),
            channel_colors: pairs(&[
                ("Social", "#3498db"),
                ("Email", "#e74c3c"),
                ("Organic", "#2ecc71"),
                ("Paid", "#f39c12"),
            ]),
            stage_colors: pairs(&[
                ("Awareness", "#9b59b6"),
                ("Interest", "#3498db"),
                ("Decision", "#1abc9c"),
            ]),
            stage_fallback: "#95a5a6".to_string(),
            outcome_colors: pairs(&[
                ("Converted", "#27ae60"),
                ("Abandoned", "#c0392b"),
                ("Pending", "#f39c12"),
            ]),
            native: 800,
            size: 512,
            text: None,
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub rows: usize,
    /// Volume per `(Channel, Stage, Outcome)`, sorted by key
    pub flows: GroupedSum,
    /// Ribbons drawn across both hops
    pub links: usize,
    pub artifacts: Vec<Artifact>,
}

#[instrument(skip_all, fields(input = %config.input.display()), level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("journey");

    let source = FileSource::csv(&config.input);
    let table = ctx.stage("source", || {
        info!("loading {}", source.describe());
        let table = source.load()?;
        table.require_columns(&DIMENSIONS)?;
        table.numeric(VOLUME)?;
        Ok::<_, chartflow_core::Error>(table)
    })?;
    info!("Data loaded: {} rows", table.n_rows());
    let mut out = OutputDir::create(out_dir)?;

    let flows = ctx.stage("aggregate", || grouped_sum(&table, &DIMENSIONS, VOLUME))?;
    info!(groups = flows.len(), total = flows.total(), "journey flows summed");
    ctx.set_metadata("flows", flows.len());

    let text = text_mode(config.text);
    let (image, links) = ctx.stage("render", || -> Result<_> {
        let diagram = FlowDiagram::from_table(
            &table,
            &DIMENSIONS,
            VOLUME,
            &[FlowColoring::Source, FlowColoring::Target],
        )?
        .with_colors("Channel", CategoryColors::from_hex(&config.channel_colors)?)?
        .with_colors(
            "Stage",
            CategoryColors::from_hex(&config.stage_colors)?
                .with_fallback(parse_hex(&config.stage_fallback)?),
        )?
        .with_colors("Outcome", CategoryColors::from_hex(&config.outcome_colors)?)?;

        let spec = ChartSpec::square(ChartKind::Flow, config.size)
            .with_native(config.native, config.native)
            .with_title(TITLE)
            .with_watermark(config.watermark.clone())
            .with_text(text);
        Ok((render(&spec, &diagram)?, diagram.links().len()))
    })?;

    ctx.stage("publish", || -> Result<()> {
        out.write_png("chart.png", &image)?;
        out.write_summary_csv("journey_flows.csv", &SummaryResult::from(flows.clone()))?;
        Ok(())
    })?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        rows: table.n_rows(),
        flows,
        links,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palettes_parse() {
        let config = Config::default();
        let stages = CategoryColors::from_hex(&config.stage_colors)
            .unwrap()
            .with_fallback(parse_hex(&config.stage_fallback).unwrap());
        assert_eq!(stages.get("Awareness"), parse_hex("#9b59b6").unwrap());
        assert_eq!(stages.get("Retention"), parse_hex("#95a5a6").unwrap());
        assert!(CategoryColors::from_hex(&config.outcome_colors)
            .unwrap()
            .contains("Pending"));
    }

    #[test]
    fn test_shipped_sample_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(Config::default().input);
        let table = FileSource::csv(path).load().unwrap();
        assert_eq!(table.n_rows(), 12);
        let flows = grouped_sum(&table, &DIMENSIONS, VOLUME).unwrap();
        assert_eq!(flows.total(), table.numeric(VOLUME).unwrap().iter().sum::<f64>());
    }
}
