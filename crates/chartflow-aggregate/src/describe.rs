//! Descriptive statistics: means, spreads, quantiles and box summaries

use chartflow_core::table::Table;
use chartflow_core::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::instrument;

/// Arithmetic mean; NaN for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divides by n)
pub fn population_std_dev(values: &[f64]) -> f64 {
    values.iter().population_std_dev()
}

/// Linear-interpolated quantile of an ascending sample (R type 7)
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter(format!(
            "quantile probability {p} outside [0, 1]"
        )));
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Quantile of an unsorted sample
pub fn quantile(values: &[f64], p: f64) -> Result<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, p)
}

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within 1.5 IQR below `q1`
    pub lower_whisker: f64,
    /// Largest observation within 1.5 IQR above `q3`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub mean: f64,
}

impl BoxStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Box statistics of a non-empty sample
pub fn box_stats(values: &[f64]) -> Result<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let fence = 1.5 * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

    // whiskers never end inside the box
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= lo_fence)
        .map_or(q1, |v| v.min(q1));
    let upper_whisker = sorted
        .iter()
        .copied()
        .rev()
        .find(|v| *v <= hi_fence)
        .map_or(q3, |v| v.max(q3));
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Ok(BoxStats {
        count: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
        mean: mean(&sorted),
    })
}

/// Per-category box statistics of `value`, in the given category order
///
/// Categories in `order` that never occur are skipped; categories missing
/// from `order` are appended in order of first appearance.
#[instrument(skip(table, order), level = "debug")]
pub fn describe(table: &Table, key: &str, value: &str, order: &[&str]) -> Result<Vec<(String, BoxStats)>> {
    let keys = table.categorical(key)?;
    let values = table.numeric(value)?;

    let mut categories: Vec<&str> = order
        .iter()
        .copied()
        .filter(|c| keys.iter().any(|k| k.as_str() == *c))
        .collect();
    for category in table.distinct(key)? {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
        .into_iter()
        .map(|category| {
            let sample: Vec<f64> = keys
                .iter()
                .zip(values)
                .filter(|(k, _)| k.as_str() == category)
                .map(|(_, v)| *v)
                .collect();
            Ok((category.to_string(), box_stats(&sample)?))
        })
        .collect()
}

/// Mean of `value` per category of `key`, ordered by category name
pub fn group_means(table: &Table, key: &str, value: &str) -> Result<Vec<(String, f64)>> {
    let keys = table.categorical(key)?;
    let values = table.numeric(value)?;
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (k, v) in keys.iter().zip(values) {
        groups.entry(k.as_str()).or_default().push(*v);
    }
    Ok(groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), mean(&v)))
        .collect())
}

/// The entry with the largest value; the first one wins ties
pub fn arg_max(entries: &[(String, f64)]) -> Option<(&str, f64)> {
    entries
        .iter()
        .fold(None, |best: Option<(&str, f64)>, (k, v)| match best {
            Some((_, b)) if b >= *v => best,
            _ => Some((k.as_str(), *v)),
        })
}
