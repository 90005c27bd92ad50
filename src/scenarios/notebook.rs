//! A reactive notebook: three slider inputs feeding six cells
//!
//! ```text
//! sample_size ─┬─> generate_data ─┬─> dynamic_output
//! noise_level ─┤                  └─> data_table
//! correlation ─┘
//! sample_size, noise_level ──> visual_indicator
//! (no inputs) ──> introduction, footer
//! ```
//!
//! Changing a slider re-runs only the cells downstream of it.

use super::{finish, WATERMARK};
use crate::Result;
use chartflow_aggregate::{mean, pearson, population_std_dev, ZeroVariancePolicy};
use chartflow_core::{
    round_to, Cell, CellGraph, CellValue, Error, Outputs, PipelineContext, SyntheticColumn,
    SyntheticSpec,
};
use chartflow_publish::{Artifact, ArtifactKind, OutputDir};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const SAMPLE_SIZE: &str = "sample_size";
pub const NOISE_LEVEL: &str = "noise_level";
pub const CORRELATION: &str = "correlation";

/// A bounded input moving in fixed steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
    pub value: f64,
}

impl Slider {
    pub fn new(start: f64, stop: f64, step: f64, value: f64) -> Self {
        Self {
            start,
            stop,
            step,
            value,
        }
    }

    /// Clamp into range and round to the nearest step
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.start, self.stop);
        let steps = ((clamped - self.start) / self.step).round();
        round_to((self.start + steps * self.step).min(self.stop), 6)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub sample_size: Slider,
    pub noise_level: Slider,
    pub correlation: Slider,
    pub seed: u64,
    pub preview_rows: usize,
    /// Slider moves applied after the first evaluation, in order
    pub updates: Vec<(String, f64)>,
    pub watermark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_size: Slider::new(10.0, 500.0, 10.0, 100.0),
            noise_level: Slider::new(0.0, 2.0, 0.1, 0.5),
            correlation: Slider::new(-1.0, 1.0, 0.1, 0.7),
            seed: 42,
            preview_rows: 10,
            updates: Vec::new(),
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// Cells run by the first evaluation
    pub executed: Vec<String>,
    /// Cells re-run by each entry of `Config::updates`
    pub reruns: Vec<Vec<String>>,
    pub actual_correlation: f64,
    pub strength: String,
    pub artifacts: Vec<Artifact>,
}

/// `Strong` from 0.8, `Moderate` from 0.5, otherwise `Weak`, on the absolute value
pub fn strength(r: f64) -> &'static str {
    let r = r.abs();
    if r >= 0.8 {
        "Strong"
    } else if r >= 0.5 {
        "Moderate"
    } else {
        "Weak"
    }
}

/// Emoji row shown under the strength heading
pub fn strength_indicator(label: &str) -> &'static str {
    match label {
        "Strong" => "🟢🟢🟢🟢🟢",
        "Moderate" => "🟡🟡🟡",
        _ => "🔴",
    }
}

/// The cell graph plus the sliders bound to its inputs
pub struct Notebook {
    graph: CellGraph,
    sliders: Vec<(&'static str, &'static str, Slider)>,
}

impl Notebook {
    pub fn new(config: &Config) -> Result<Self> {
        let sliders = vec![
            (SAMPLE_SIZE, "Sample Size (n)", config.sample_size),
            (NOISE_LEVEL, "Noise Level (σ)", config.noise_level),
            (CORRELATION, "Correlation (r)", config.correlation),
        ];
        let mut builder = CellGraph::builder();
        for (name, _, slider) in &sliders {
            builder = builder.input(*name, slider.snap(slider.value));
        }
        let graph = builder
            .cell(introduction())
            .cell(generate_data(config.seed))
            .cell(dynamic_output())
            .cell(visual_indicator())
            .cell(data_table(config.preview_rows))
            .cell(footer(config.watermark.clone()))
            .build()?;
        Ok(Self { graph, sliders })
    }

    /// Run every cell; returns their names in execution order
    pub fn evaluate(&mut self) -> Result<Vec<String>> {
        Ok(self.graph.evaluate()?)
    }

    /// Move a slider; returns the cells that re-ran
    pub fn set(&mut self, input: &str, value: f64) -> Result<Vec<String>> {
        if !value.is_finite() {
            return Err(Error::InvalidParameter(format!("{input} = {value}")).into());
        }
        let slider = self
            .slider(input)
            .ok_or_else(|| Error::Graph(format!("unknown input '{input}'")))?;
        let snapped = slider.snap(value);
        Ok(self.graph.set_input(input, snapped)?)
    }

    pub fn slider(&self, input: &str) -> Option<Slider> {
        self.sliders
            .iter()
            .find(|(name, _, _)| *name == input)
            .map(|(_, _, s)| *s)
    }

    /// Current value of any input or cell output
    pub fn value(&self, binding: &str) -> Option<&CellValue> {
        self.graph.value(binding)
    }

    pub fn number(&self, binding: &str) -> Result<f64> {
        self.value(binding)
            .and_then(CellValue::as_number)
            .ok_or_else(|| Error::Graph(format!("'{binding}' holds no number")).into())
    }

    fn text(&self, binding: &str) -> Result<&str> {
        self.value(binding)
            .and_then(CellValue::as_text)
            .ok_or_else(|| Error::Graph(format!("'{binding}' holds no text")).into())
    }

    /// Cell outputs in notebook order, with the current slider positions
    pub fn to_markdown(&self) -> Result<String> {
        let mut md = String::new();
        md.push_str(self.text("intro_md")?);

        md.push_str("## Interactive Controls\n\n");
        md.push_str("| Control | Range | Step | Value |\n");
        md.push_str("|---------|-------|------|-------|\n");
        for (name, label, slider) in &self.sliders {
            md.push_str(&format!(
                "| {label} | {} to {} | {} | **{}** |\n",
                slider.start,
                slider.stop,
                slider.step,
                self.number(name)?
            ));
        }
        md.push_str("\n---\n\n");

        for binding in ["summary_md", "indicator_md", "preview_md", "footer_md"] {
            md.push_str(self.text(binding)?);
        }
        Ok(md)
    }
}

fn introduction() -> Cell {
    Cell::new("introduction", &[], &["intro_md"], |_| {
        Ok(Outputs::new().set(
            "intro_md",
            "# Interactive Data Analysis Notebook\n\n\
             This notebook demonstrates the relationship between variables \
             using slider inputs. Moving a slider re-runs only the cells that \
             depend on it.\n\n---\n\n",
        ))
    })
}

fn generate_data(seed: u64) -> Cell {
    Cell::new(
        "generate_data",
        &[SAMPLE_SIZE, NOISE_LEVEL, CORRELATION],
        &["data", "n", "mean_x", "mean_y", "std_x", "std_y", "actual_corr"],
        move |i| {
            let n = i.number(SAMPLE_SIZE)? as usize;
            let sigma = i.number(NOISE_LEVEL)?;
            let r = i.number(CORRELATION)?;

            let data = SyntheticSpec::new(seed, n)
                .column(SyntheticColumn::linspace("X", 0.0, 10.0))
                .column(SyntheticColumn::derived("Y", 0.0).term("X", r).noise(sigma))
                .generate()?;
            let x = data.numeric("X")?;
            let y = data.numeric("Y")?;
            // a constant series has no correlation; report 0
            let actual = pearson(x, y, ZeroVariancePolicy::Zero)?;

            Ok(Outputs::new()
                .set("n", n as i64)
                .set("mean_x", mean(x))
                .set("mean_y", mean(y))
                .set("std_x", population_std_dev(x))
                .set("std_y", population_std_dev(y))
                .set("actual_corr", actual)
                .set("data", data))
        },
    )
}

fn dynamic_output() -> Cell {
    Cell::new(
        "dynamic_output",
        &[
            "n",
            "actual_corr",
            "mean_x",
            "mean_y",
            "std_x",
            "std_y",
            NOISE_LEVEL,
            CORRELATION,
        ],
        &["summary_md", "strength"],
        |i| {
            let actual = i.number("actual_corr")?;
            let label = strength(actual);
            let mut md = String::from("## Data Summary\n\n| Parameter | Value |\n|-----------|-------|\n");
            md.push_str(&format!("| Sample Size | **{}** |\n", i.integer("n")?));
            md.push_str(&format!("| Target Correlation | **{:.2}** |\n", i.number(CORRELATION)?));
            md.push_str(&format!("| Actual Correlation | **{actual:.4}** |\n"));
            md.push_str(&format!("| Noise Level | **{:.2}** |\n", i.number(NOISE_LEVEL)?));
            md.push_str(&format!("| Mean(X) | {:.2} |\n", i.number("mean_x")?));
            md.push_str(&format!("| Mean(Y) | {:.2} |\n", i.number("mean_y")?));
            md.push_str(&format!("| Std(X) | {:.2} |\n", i.number("std_x")?));
            md.push_str(&format!("| Std(Y) | {:.2} |\n", i.number("std_y")?));
            md.push_str(&format!(
                "\n### Correlation Strength: {label}\n\n{}\n\n\
                 *This output updates reactively when you move the sliders above.*\n\n---\n\n",
                strength_indicator(label)
            ));
            Ok(Outputs::new().set("summary_md", md).set("strength", label))
        },
    )
}

fn visual_indicator() -> Cell {
    Cell::new(
        "visual_indicator",
        &[SAMPLE_SIZE, NOISE_LEVEL],
        &["indicator_md"],
        |i| {
            let n = i.number(SAMPLE_SIZE)?;
            let noise = i.number(NOISE_LEVEL)?;
            let size_bars = (n as usize) / 10;
            // snapped tenths times five can land just under a whole number
            let noise_bars = (noise * 5.0 + 1e-9).floor() as usize;
            let md = format!(
                "## Visual Indicators\n\n**Sample Size:** {} ({n})\n\n**Noise Level:** {} ({noise:.1})\n\n---\n\n",
                "█".repeat(size_bars),
                "░".repeat(noise_bars),
            );
            Ok(Outputs::new().set("indicator_md", md))
        },
    )
}

fn data_table(rows: usize) -> Cell {
    Cell::new("data_table", &["data"], &["preview_md"], move |i| {
        let data = i.table("data")?;
        let head = data.head(rows);
        let x = head.numeric("X")?;
        let y = head.numeric("Y")?;
        let mut md = format!(
            "## Generated Data Preview\n\nShowing first {} rows of {} total samples:\n\n| | X | Y |\n|---|---|---|\n",
            head.n_rows(),
            data.n_rows()
        );
        for (row, (x, y)) in x.iter().zip(y).enumerate() {
            md.push_str(&format!("| {row} | {x:.4} | {y:.4} |\n"));
        }
        md.push('\n');
        Ok(Outputs::new().set("preview_md", md))
    })
}

fn footer(watermark: String) -> Cell {
    Cell::new("footer", &[], &["footer_md"], move |_| {
        let md = format!(
            "---\n\n## Notebook Information\n\n\
             ### Cell Dependencies\n\n\
             1. **introduction** - no dependencies\n\
             2. **generate_data** - sample_size, noise_level, correlation\n\
             3. **dynamic_output** - generate_data, noise_level, correlation\n\
             4. **visual_indicator** - sample_size, noise_level\n\
             5. **data_table** - generate_data\n\
             6. **footer** - no dependencies\n\n\
             *{watermark}*\n"
        );
        Ok(Outputs::new().set("footer_md", md))
    })
}

#[instrument(skip_all, level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("notebook");
    let mut out = OutputDir::create(out_dir)?;

    let mut notebook = ctx.stage("source", || Notebook::new(config))?;
    let executed = ctx.stage("aggregate", || notebook.evaluate())?;
    info!("executed cells: {}", executed.join(" -> "));

    let reruns = ctx.stage("update", || -> Result<Vec<Vec<String>>> {
        config
            .updates
            .iter()
            .map(|(input, value)| {
                let rerun = notebook.set(input, *value)?;
                info!("{input} = {value}: re-ran {}", rerun.join(", "));
                Ok(rerun)
            })
            .collect()
    })?;

    let actual_correlation = notebook.number("actual_corr")?;
    let strength = notebook.text("strength")?.to_string();
    info!("actual correlation {actual_correlation:.4} ({strength})");

    ctx.stage("publish", || -> Result<()> {
        let md = notebook.to_markdown()?;
        out.write_text("notebook.md", &md, ArtifactKind::Markdown)?;
        Ok(())
    })?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        executed,
        reruns,
        actual_correlation,
        strength,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_snaps_and_clamps() {
        let size = Slider::new(10.0, 500.0, 10.0, 100.0);
        assert_eq!(size.snap(123.0), 120.0);
        assert_eq!(size.snap(5000.0), 500.0);
        assert_eq!(size.snap(-3.0), 10.0);

        let r = Slider::new(-1.0, 1.0, 0.1, 0.7);
        assert_eq!(r.snap(0.74), 0.7);
        assert_eq!(r.snap(-0.04), 0.0);
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(strength(0.8), "Strong");
        assert_eq!(strength(-0.95), "Strong");
        assert_eq!(strength(0.5), "Moderate");
        assert_eq!(strength(0.49), "Weak");
        assert_eq!(strength_indicator(strength(0.9)), "🟢🟢🟢🟢🟢");
        assert_eq!(strength_indicator(strength(0.6)), "🟡🟡🟡");
        assert_eq!(strength_indicator(strength(0.1)), "🔴");
    }

    #[test]
    fn test_first_evaluation_runs_every_cell() {
        let mut notebook = Notebook::new(&Config::default()).unwrap();
        let executed = notebook.evaluate().unwrap();
        assert_eq!(executed.len(), 6);
        let pos = |name: &str| executed.iter().position(|c| c == name).unwrap();
        assert!(pos("generate_data") < pos("dynamic_output"));
        assert!(pos("generate_data") < pos("data_table"));

        assert_eq!(notebook.value("n"), Some(&CellValue::Integer(100)));
        // r = 0.7 over x in [0, 10] with sigma 0.5 is a near-perfect line
        assert!(notebook.number("actual_corr").unwrap() > 0.95);
    }

    #[test]
    fn test_indicator_bars() {
        let mut notebook = Notebook::new(&Config::default()).unwrap();
        notebook.evaluate().unwrap();
        notebook.set(NOISE_LEVEL, 0.6).unwrap();
        let md = notebook.text("indicator_md").unwrap();
        assert!(md.contains(&format!("**Sample Size:** {} (100)", "█".repeat(10))));
        assert!(md.contains(&format!("**Noise Level:** {} (0.6)", "░".repeat(3))));
    }

    #[test]
    fn test_flat_data_has_zero_correlation() {
        let mut notebook = Notebook::new(&Config::default()).unwrap();
        notebook.evaluate().unwrap();
        notebook.set(NOISE_LEVEL, 0.0).unwrap();
        notebook.set(CORRELATION, 0.0).unwrap();
        assert_eq!(notebook.number("actual_corr").unwrap(), 0.0);
        assert_eq!(notebook.value("strength").and_then(CellValue::as_text), Some("Weak"));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut notebook = Notebook::new(&Config::default()).unwrap();
        assert!(notebook.set(CORRELATION, f64::NAN).is_err());
        assert!(notebook.set("volume", 1.0).is_err());
    }
}
