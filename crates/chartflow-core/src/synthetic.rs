//! Deterministic synthetic table generation
//!
//! Columns are generated in declaration order from a single seeded
//! `ChaCha8Rng`, so the same spec always yields the same table. Clipping is
//! applied as each column is generated; rounding to the declared precision
//! happens only once every column exists, so derived columns see the clipped
//! but unrounded values of their inputs.

use crate::numeric::{linspace, round_to};
use crate::source::TableSource;
use crate::table::{Column, Field, Table, ValueRange};
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a numeric column's values are produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Generator {
    /// Independent draws from N(mean, std_dev)
    Normal { mean: f64, std_dev: f64 },
    /// Evenly spaced values from `start` to `end` inclusive
    Linspace { start: f64, end: f64 },
    /// `intercept + sum(coef * column) + N(0, noise_std_dev)` over earlier columns
    Derived {
        intercept: f64,
        terms: Vec<(String, f64)>,
        noise_std_dev: f64,
    },
    /// The same value in every row
    Constant(f64),
}

/// One generated column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticColumn {
    pub name: String,
    pub generator: Generator,
    pub clip: Option<ValueRange>,
    pub decimals: Option<u32>,
}

impl SyntheticColumn {
    pub fn new(name: impl Into<String>, generator: Generator) -> Self {
        Self {
            name: name.into(),
            generator,
            clip: None,
            decimals: None,
        }
    }

    pub fn normal(name: impl Into<String>, mean: f64, std_dev: f64) -> Self {
        Self::new(name, Generator::Normal { mean, std_dev })
    }

    pub fn linspace(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self::new(name, Generator::Linspace { start, end })
    }

    /// A derived column with no terms yet; add them with [`Self::term`]
    pub fn derived(name: impl Into<String>, intercept: f64) -> Self {
        Self::new(
            name,
            Generator::Derived {
                intercept,
                terms: Vec::new(),
                noise_std_dev: 0.0,
            },
        )
    }

    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, Generator::Constant(value))
    }

    /// Add `coefficient * column` to a derived column
    pub fn term(mut self, column: impl Into<String>, coefficient: f64) -> Self {
        if let Generator::Derived { terms, .. } = &mut self.generator {
            terms.push((column.into(), coefficient));
        }
        self
    }

    /// Gaussian noise added to a derived column
    pub fn noise(mut self, std_dev: f64) -> Self {
        if let Generator::Derived { noise_std_dev, .. } = &mut self.generator {
            *noise_std_dev = std_dev;
        }
        self
    }

    pub fn clip(mut self, min: f64, max: f64) -> Self {
        self.clip = Some(ValueRange { min, max });
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

/// Column-wise synthetic table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub seed: u64,
    pub rows: usize,
    pub columns: Vec<SyntheticColumn>,
}

impl SyntheticSpec {
    pub fn new(seed: u64, rows: usize) -> Self {
        Self {
            seed,
            rows,
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: SyntheticColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Generate the table
    #[instrument(skip(self), fields(seed = self.seed, rows = self.rows), level = "debug")]
    pub fn generate(&self) -> Result<Table> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut generated: Vec<(&SyntheticColumn, Vec<f64>)> = Vec::with_capacity(self.columns.len());

        for spec in &self.columns {
            if generated.iter().any(|(c, _)| c.name == spec.name) {
                return Err(Error::InvalidParameter(format!(
                    "synthetic column '{}' declared twice",
                    spec.name
                )));
            }
            let mut values = match &spec.generator {
                Generator::Normal { mean, std_dev } => {
                    let dist = normal(*mean, *std_dev)?;
                    (0..self.rows).map(|_| dist.sample(&mut rng)).collect::<Vec<_>>()
                }
                Generator::Linspace { start, end } => linspace(*start, *end, self.rows),
                Generator::Constant(value) => vec![*value; self.rows],
                Generator::Derived {
                    intercept,
                    terms,
                    noise_std_dev,
                } => {
                    let inputs = terms
                        .iter()
                        .map(|(name, coef)| {
                            generated
                                .iter()
                                .find(|(c, _)| &c.name == name)
                                .map(|(_, v)| (v, *coef))
                                .ok_or_else(|| {
                                    Error::InvalidParameter(format!(
                                        "derived column '{}' refers to '{name}', which is not generated before it",
                                        spec.name
                                    ))
                                })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    let noise = normal(0.0, *noise_std_dev)?;
                    (0..self.rows)
                        .map(|i| {
                            let base = inputs.iter().fold(*intercept, |acc, (v, coef)| acc + coef * v[i]);
                            base + noise.sample(&mut rng)
                        })
                        .collect()
                }
            };

            if let Some(range) = spec.clip {
                let range = ValueRange::new(range.min, range.max)?;
                values.iter_mut().for_each(|v| *v = range.clip(*v));
            }
            generated.push((spec, values));
        }

        let mut builder = Table::builder();
        for (spec, mut values) in generated {
            let mut field = Field::numeric(spec.name.clone());
            if let Some(range) = spec.clip {
                field = field.with_range(range);
            }
            if let Some(decimals) = spec.decimals {
                values.iter_mut().for_each(|v| *v = round_to(*v, decimals));
                field = field.with_decimals(decimals);
            }
            builder = builder.column(field, Column::Numeric(values));
        }
        let table = builder.build()?;
        debug!(columns = table.n_columns(), "synthetic table generated");
        Ok(table)
    }
}

impl TableSource for SyntheticSpec {
    fn load(&self) -> Result<Table> {
        self.generate()
    }

    fn describe(&self) -> String {
        format!(
            "synthetic table ({} rows x {} columns, seed {})",
            self.rows,
            self.columns.len(),
            self.seed
        )
    }
}

/// One segment of a segmented table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl Segment {
    pub fn new(name: impl Into<String>, mean: f64, std_dev: f64, count: usize) -> Self {
        Self {
            name: name.into(),
            mean,
            std_dev,
            count,
        }
    }
}

/// A categorical column plus a numeric column drawn per segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedSpec {
    pub seed: u64,
    pub category: String,
    pub value: String,
    pub segments: Vec<Segment>,
    pub clip: Option<ValueRange>,
    pub decimals: Option<u32>,
}

impl SegmentedSpec {
    pub fn new(seed: u64, category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            seed,
            category: category.into(),
            value: value.into(),
            segments: Vec::new(),
            clip: None,
            decimals: None,
        }
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn clip(mut self, min: f64, max: f64) -> Self {
        self.clip = Some(ValueRange { min, max });
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Segment names in declaration order
    pub fn order(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name.clone()).collect()
    }

    #[instrument(skip(self), fields(seed = self.seed), level = "debug")]
    pub fn generate(&self) -> Result<Table> {
        let range = self
            .clip
            .map(|r| ValueRange::new(r.min, r.max))
            .transpose()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let total = self.segments.iter().map(|s| s.count).sum();
        let mut labels = Vec::with_capacity(total);
        let mut values = Vec::with_capacity(total);

        for segment in &self.segments {
            let dist = normal(segment.mean, segment.std_dev)?;
            for _ in 0..segment.count {
                let mut v = dist.sample(&mut rng);
                if let Some(range) = range {
                    v = range.clip(v);
                }
                if let Some(d) = self.decimals {
                    v = round_to(v, d);
                }
                labels.push(segment.name.clone());
                values.push(v);
            }
        }

        let mut value_field = Field::numeric(self.value.clone());
        if let Some(range) = range {
            value_field = value_field.with_range(range);
        }
        if let Some(d) = self.decimals {
            value_field = value_field.with_decimals(d);
        }
        Table::builder()
            .column(Field::categorical(self.category.clone()), Column::Categorical(labels))
            .column(value_field, Column::Numeric(values))
            .build()
    }
}

impl TableSource for SegmentedSpec {
    fn load(&self) -> Result<Table> {
        self.generate()
    }

    fn describe(&self) -> String {
        format!(
            "segmented table ({} segments, seed {})",
            self.segments.len(),
            self.seed
        )
    }
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| {
        Error::InvalidParameter(format!("normal({mean}, {std_dev}): {e}"))
    })
}
