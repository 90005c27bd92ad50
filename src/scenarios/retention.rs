//! Quarterly customer retention against an industry benchmark

use super::{finish, text_mode, WATERMARK};
use crate::Result;
use chartflow_aggregate::mean;
use chartflow_core::{format_number, round_to, Column, Field, PipelineContext, Table};
use chartflow_publish::{Artifact, OutputDir};
use chartflow_render::{
    parse_hex, render, ChartKind, ChartSpec, DashPattern, LineChart, LineStyle, ReferenceLine,
    TextMode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const TITLE: &str = "E-Commerce Customer Retention Trend\nQuarterly Analysis";
pub const CSV_PATH: &str = "data/retention_quarterly.csv";
pub const CHART_PATH: &str = "visuals/retention_trend.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// `(quarter, retention %)` in time order
    pub quarters: Vec<(String, f64)>,
    pub benchmark: f64,
    pub y_range: (f64, f64),
    pub width: u32,
    pub height: u32,
    pub line_color: String,
    pub benchmark_color: String,
    pub average_color: String,
    pub text: Option<TextMode>,
    pub watermark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quarters: [("Q1", 72.26), ("Q2", 71.57), ("Q3", 74.89), ("Q4", 77.52)]
                .iter()
                .map(|(q, v)| (q.to_string(), *v))
                .collect(),
            benchmark: 85.0,
            y_range: (65.0, 90.0),
            width: 1500,
            height: 900,
            line_color: "#2E86AB".to_string(),
            benchmark_color: "#E63946".to_string(),
            average_color: "#457B9D".to_string(),
            text: None,
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// Mean retention, 2 decimals
    pub average: f64,
    /// `benchmark - average`, 2 decimals
    pub gap: f64,
    pub artifacts: Vec<Artifact>,
}

/// Average and gap to the benchmark, each rounded to 2 decimals
pub fn headline(values: &[f64], benchmark: f64) -> (f64, f64) {
    let average = round_to(mean(values), 2);
    (average, round_to(benchmark - average, 2))
}

pub fn quarterly_table(config: &Config) -> Result<Table> {
    let (quarters, values): (Vec<String>, Vec<f64>) = config.quarters.iter().cloned().unzip();
    Ok(Table::builder()
        .column(Field::categorical("quarter"), Column::Categorical(quarters))
        .column(
            Field::numeric("retention").with_decimals(2),
            Column::Numeric(values),
        )
        .build()?)
}

#[instrument(skip_all, level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("retention");
    let mut out = OutputDir::create(out_dir)?;

    let table = ctx.stage("source", || quarterly_table(config))?;
    for (quarter, rate) in &config.quarters {
        info!("  {quarter}: {rate}%");
    }

    let (average, gap) = ctx.stage("aggregate", || -> Result<_> {
        Ok(headline(table.numeric("retention")?, config.benchmark))
    })?;
    ctx.set_metadata("average", average);
    info!("Average Retention Rate: {average}%");
    info!("Industry Benchmark Target: {}%", config.benchmark);
    info!("Gap to Target: {gap}%");

    let text = text_mode(config.text);
    let image = ctx.stage("render", || -> Result<_> {
        let chart = LineChart::new("Quarterly Retention Rate", config.quarters.clone())
            .with_style(LineStyle {
                suffix: "%".to_string(),
                y_desc: Some("Retention Rate (%)".to_string()),
                ..LineStyle::default()
            })
            .with_color(&config.line_color)?
            .with_y_range(config.y_range.0, config.y_range.1)?
            .with_reference(ReferenceLine::new(
                config.benchmark,
                parse_hex(&config.benchmark_color)?,
                DashPattern::Dashed,
                format!("Industry Benchmark ({}%)", format_number(config.benchmark, None)),
            ))
            .with_reference(
                ReferenceLine::new(
                    average,
                    parse_hex(&config.average_color)?,
                    DashPattern::Dotted,
                    format!("Average Retention ({average}%)"),
                )
                .with_width(1),
            );
        let spec = ChartSpec::new(ChartKind::Line, config.width, config.height)
            .with_title(TITLE)
            .with_watermark(config.watermark.clone())
            .with_text(text);
        Ok(render(&spec, &chart)?)
    })?;

    ctx.stage("publish", || -> Result<()> {
        out.write_table_csv(CSV_PATH, &table)?;
        out.write_png(CHART_PATH, &image)?;
        Ok(())
    })?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        average,
        gap,
        artifacts,
    })
}
