//! Correlations between five synthetic supply-chain metrics

use super::{finish, text_mode, WATERMARK};
use crate::Result;
use chartflow_aggregate::summary::CORRELATION_DECIMALS;
use chartflow_aggregate::{correlation_matrix, CorrelationPair, ZeroVariancePolicy};
use chartflow_core::{PipelineContext, SyntheticColumn, SyntheticSpec, TableSource};
use chartflow_publish::{Artifact, ArtifactKind, OutputDir, Template, TemplateValues};
use chartflow_render::{render, ChartKind, ChartSpec, Heatmap, TextMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const TITLE: &str = "Supply Chain Metrics Correlation Matrix\n(Red=Negative, White=Zero, Green=Positive)";

/// `(column, description, unit)` of every generated metric
pub const VARIABLES: [(&str, &str, &str); 5] = [
    ("Supplier_Lead_Time", "Days from order to delivery", "Days"),
    ("Inventory_Levels", "Current stock quantities", "Units"),
    ("Order_Frequency", "Orders placed per month", "Count"),
    ("Delivery_Performance", "On-time delivery rate", "%"),
    ("Cost_Per_Unit", "Unit cost", "$"),
];

const README: &str = "# Supply Chain Correlation Analysis

Analysis of {{rows}} procurement transactions to understand relationships
between key supply chain metrics.

## Dataset Variables

| Variable | Description | Unit |
|----------|-------------|------|
{{variables}}
## Files

- `README.md` - this file
- `supply_chain_data.csv` - raw dataset ({{rows}} transactions)
- `correlation.csv` - correlation matrix values
- `heatmap.png` - heatmap, {{size}}x{{size}}
- `heatmap_hd.png` - heatmap, {{hd_size}}x{{hd_size}}

## Correlation Matrix

The heatmap uses a diverging red-white-green scale:

- **Red** = negative correlation
- **White** = no correlation
- **Green** = positive correlation

## Ranked Correlations

| Variable A | Variable B | r | Interpretation |
|------------|------------|---|----------------|
{{pairs}}
---

*{{watermark}}*
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub seed: u64,
    pub rows: usize,
    /// Edge of `heatmap.png`
    pub size: u32,
    /// Edge of `heatmap_hd.png`
    pub hd_size: u32,
    /// `None` draws text when a system font is available
    pub text: Option<TextMode>,
    pub watermark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            rows: 50,
            size: 512,
            hd_size: 1024,
            text: None,
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub rows: usize,
    /// Off-diagonal pairs, strongest first
    pub pairs: Vec<CorrelationPair>,
    pub artifacts: Vec<Artifact>,
}

/// The generator behind `supply_chain_data.csv`
pub fn data_source(config: &Config) -> SyntheticSpec {
    SyntheticSpec::new(config.seed, config.rows)
        .column(
            SyntheticColumn::normal("Supplier_Lead_Time", 14.0, 5.0)
                .clip(3.0, 30.0)
                .decimals(1),
        )
        .column(
            SyntheticColumn::normal("Inventory_Levels", 500.0, 150.0)
                .clip(100.0, 1000.0)
                .decimals(0),
        )
        .column(
            SyntheticColumn::derived("Order_Frequency", 20.0)
                .term("Inventory_Levels", -0.01)
                .noise(3.0)
                .clip(2.0, 25.0)
                .decimals(1),
        )
        .column(
            SyntheticColumn::derived("Delivery_Performance", 95.0)
                .term("Supplier_Lead_Time", -1.5)
                .noise(5.0)
                .clip(60.0, 100.0)
                .decimals(1),
        )
        .column(
            SyntheticColumn::derived("Cost_Per_Unit", 25.0)
                .term("Supplier_Lead_Time", 0.5)
                .term("Delivery_Performance", -0.1)
                .noise(3.0)
                .clip(15.0, 50.0)
                .decimals(2),
        )
}

#[instrument(skip(config, out_dir), fields(seed = config.seed), level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("supply_chain");
    ctx.set_metadata("seed", config.seed);
    let mut out = OutputDir::create(out_dir)?;

    let source = data_source(config);
    let table = ctx.stage("source", || {
        info!("generating {}", source.describe());
        source.load()
    })?;

    let matrix = ctx.stage("aggregate", || {
        correlation_matrix(&table, &[], ZeroVariancePolicy::default())
    })?;
    let pairs = matrix.ranked_pairs();
    for pair in &pairs {
        info!(
            "{} <-> {}: {:.4} ({} {})",
            pair.a, pair.b, pair.r, pair.strength, pair.direction
        );
    }

    let text = text_mode(config.text);
    let (standard, hd) = ctx.stage("render", || -> Result<_> {
        let heatmap = Heatmap::new(&matrix);
        let spec = |size: u32| {
            ChartSpec::square(ChartKind::Heatmap, size)
                .with_title(TITLE)
                .with_watermark(config.watermark.clone())
                .with_text(text)
        };
        Ok((render(&spec(config.size), &heatmap)?, render(&spec(config.hd_size), &heatmap)?))
    })?;

    ctx.stage("publish", || -> Result<()> {
        out.write_table_csv("supply_chain_data.csv", &table)?;
        out.write_table_csv("correlation.csv", &matrix.to_table(CORRELATION_DECIMALS)?)?;
        out.write_png("heatmap.png", &standard)?;
        out.write_png("heatmap_hd.png", &hd)?;
        let readme = readme(config, table.n_rows(), &pairs)?;
        out.write_text("README.md", &readme, ArtifactKind::Markdown)?;
        Ok(())
    })?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        rows: table.n_rows(),
        pairs,
        artifacts,
    })
}

fn readme(config: &Config, rows: usize, pairs: &[CorrelationPair]) -> Result<String> {
    let mut variables = String::new();
    for (name, description, unit) in VARIABLES {
        variables.push_str(&format!("| {name} | {description} | {unit} |\n"));
    }
    let mut ranked = String::new();
    for pair in pairs {
        ranked.push_str(&format!(
            "| {} | {} | {:.4} | {} {} |\n",
            pair.a, pair.b, pair.r, pair.strength, pair.direction
        ));
    }

    let values = TemplateValues::new()
        .set("rows", rows)
        .set("size", config.size)
        .set("hd_size", config.hd_size)
        .set("variables", variables)
        .set("pairs", ranked)
        .set("watermark", &config.watermark);
    Ok(Template::new(README).render(&values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_columns_follow_variable_table() {
        let table = data_source(&Config::default()).load().unwrap();
        assert_eq!(table.n_rows(), 50);
        let names: Vec<&str> = table.column_names().collect();
        let expected: Vec<&str> = VARIABLES.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(names, expected);

        let lead = table.numeric("Supplier_Lead_Time").unwrap();
        assert!(lead.iter().all(|v| (3.0..=30.0).contains(v)));
        let delivery = table.numeric("Delivery_Performance").unwrap();
        assert!(delivery.iter().all(|v| (60.0..=100.0).contains(v)));
    }

    #[test]
    fn test_readme_lists_every_pair() {
        let config = Config::default();
        let table = data_source(&config).load().unwrap();
        let matrix = correlation_matrix(&table, &[], ZeroVariancePolicy::default()).unwrap();
        let text = readme(&config, 50, &matrix.ranked_pairs()).unwrap();

        assert!(text.contains("| Cost_Per_Unit | Unit cost | $ |"));
        assert!(text.contains("`heatmap_hd.png` - heatmap, 1024x1024"));
        // five variables give ten pairs
        let pair_rows = text
            .lines()
            .skip_while(|l| !l.starts_with("| Variable A"))
            .skip(2)
            .take_while(|l| l.starts_with('|'))
            .count();
        assert_eq!(pair_rows, 10);
        assert!(!text.contains("{{"));
    }
}
