//! Purchase amounts per customer segment as a box plot

use super::{finish, text_mode, WATERMARK};
use crate::Result;
use chartflow_aggregate::{describe, BoxStats};
use chartflow_core::{PipelineContext, Segment, SegmentedSpec, TableSource};
use chartflow_publish::{Artifact, OutputDir};
use chartflow_render::{parse_hex, render, BoxPlot, BoxStyle, ChartKind, ChartSpec, TextMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const TITLE: &str = "Purchase Amount Distribution\nby Customer Segment";
pub const CATEGORY: &str = "Customer_Segment";
pub const VALUE: &str = "Purchase_Amount";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub seed: u64,
    /// Segments in plotting order
    pub segments: Vec<Segment>,
    pub clip: (f64, f64),
    pub decimals: u32,
    /// One hex colour per segment
    pub palette: Vec<String>,
    pub size: u32,
    pub text: Option<TextMode>,
    pub watermark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            segments: vec![
                Segment::new("Budget", 45.0, 20.0, 80),
                Segment::new("Regular", 120.0, 40.0, 150),
                Segment::new("Premium", 280.0, 80.0, 100),
                Segment::new("VIP", 550.0, 150.0, 50),
            ],
            clip: (10.0, 1000.0),
            decimals: 2,
            palette: ["#3498db", "#2ecc71", "#f39c12", "#e74c3c"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            size: 512,
            text: None,
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub transactions: usize,
    /// Box statistics per segment, in segment order
    pub stats: Vec<(String, BoxStats)>,
    pub artifacts: Vec<Artifact>,
}

impl Outcome {
    /// `(segment, median)` in segment order
    pub fn medians(&self) -> Vec<(&str, f64)> {
        self.stats.iter().map(|(s, b)| (s.as_str(), b.median)).collect()
    }
}

pub fn data_source(config: &Config) -> SegmentedSpec {
    config
        .segments
        .iter()
        .cloned()
        .fold(SegmentedSpec::new(config.seed, CATEGORY, VALUE), SegmentedSpec::segment)
        .clip(config.clip.0, config.clip.1)
        .decimals(config.decimals)
}

#[instrument(skip_all, fields(seed = config.seed), level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("segments");
    let mut out = OutputDir::create(out_dir)?;

    let source = data_source(config);
    let table = ctx.stage("source", || {
        info!("generating {}", source.describe());
        source.load()
    })?;
    info!("Dataset generated: {} customer transactions", table.n_rows());

    let order = source.order();
    let stats = ctx.stage("aggregate", || {
        let order: Vec<&str> = order.iter().map(String::as_str).collect();
        describe(&table, CATEGORY, VALUE, &order)
    })?;
    for (segment, s) in &stats {
        info!(
            "{segment}: n={} median=${:.2} mean=${:.2} IQR=[{:.2}, {:.2}]",
            s.count, s.median, s.mean, s.q1, s.q3
        );
    }

    let text = text_mode(config.text);
    let chart = ctx.stage("render", || -> Result<_> {
        let palette = config
            .palette
            .iter()
            .map(|hex| parse_hex(hex))
            .collect::<chartflow_render::Result<Vec<_>>>()?;
        let plot = BoxPlot::new(stats.clone()).with_style(BoxStyle {
            palette: Some(palette),
            median_prefix: Some("$".to_string()),
            y_desc: Some("Purchase Amount ($)".to_string()),
            ..BoxStyle::default()
        });
        let spec = ChartSpec::square(ChartKind::Box, config.size)
            .with_title(TITLE)
            .with_watermark(config.watermark.clone())
            .with_text(text);
        Ok(render(&spec, &plot)?)
    })?;

    ctx.stage("publish", || out.write_png("chart.png", &chart))?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        transactions: table.n_rows(),
        stats,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_in_declared_order() {
        let source = data_source(&Config::default());
        let table = source.load().unwrap();
        assert_eq!(table.n_rows(), 380);
        assert_eq!(source.order(), vec!["Budget", "Regular", "Premium", "VIP"]);
        assert_eq!(
            table.distinct(CATEGORY).unwrap(),
            vec!["Budget", "Regular", "Premium", "VIP"]
        );
        assert!(table
            .numeric(VALUE)
            .unwrap()
            .iter()
            .all(|v| (10.0..=1000.0).contains(v)));
    }

    #[test]
    fn test_medians_rise_with_segment() {
        let config = Config::default();
        let table = data_source(&config).load().unwrap();
        let stats = describe(&table, CATEGORY, VALUE, &["Budget", "Regular", "Premium", "VIP"]).unwrap();
        let medians: Vec<f64> = stats.iter().map(|(_, s)| s.median).collect();
        assert!(medians.windows(2).all(|w| w[0] < w[1]), "{medians:?}");
        assert_eq!(stats[3].1.count, 50);
    }
}
