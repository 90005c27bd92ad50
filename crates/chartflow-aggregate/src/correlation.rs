//! Pearson correlation matrices over numeric table columns

use chartflow_core::numeric::format_number;
use chartflow_core::table::{Column, Field, Table};
use chartflow_core::{Error, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

/// What to report when a coefficient involves a zero-variance column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZeroVariancePolicy {
    /// Store `f64::NAN`
    #[default]
    Nan,
    /// Store `0.0`
    Zero,
    /// Fail with [`Error::ComputationUndefined`]
    Strict,
}

/// Pearson correlation of two equally long samples
///
/// The undefined case (either sample constant) is resolved by `policy`.
pub fn pearson(x: &[f64], y: &[f64], policy: ZeroVariancePolicy) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::InvalidParameter(format!(
            "samples differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: x.len(),
        });
    }
    match pearson_raw(x, y) {
        Some(r) => Ok(r),
        None => undefined(policy, "correlation against a zero-variance sample".to_string()),
    }
}

fn undefined(policy: ZeroVariancePolicy, message: String) -> Result<f64> {
    match policy {
        ZeroVariancePolicy::Nan => Ok(f64::NAN),
        ZeroVariancePolicy::Zero => Ok(0.0),
        ZeroVariancePolicy::Strict => Err(Error::ComputationUndefined(message)),
    }
}

/// `None` when either sample has zero variance
fn pearson_raw(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((numerator / denominator).clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise coefficients with a unit diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    /// Variable names in row/column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Coefficient by index
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Coefficient by variable names
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[(i, j)])
    }

    /// Symmetric (NaN-aware) with a unit diagonal
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            self.values[(i, i)] == 1.0
                && (0..n).all(|j| {
                    let (a, b) = (self.values[(i, j)], self.values[(j, i)]);
                    a == b || (a.is_nan() && b.is_nan())
                })
        })
    }

    /// Each unordered pair once, strongest first
    ///
    /// Undefined (NaN) coefficients are left out of the ranking.
    pub fn ranked_pairs(&self) -> Vec<CorrelationPair> {
        let n = self.len();
        let mut pairs: Vec<CorrelationPair> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.values[(i, j)].is_nan())
            .map(|(i, j)| CorrelationPair::new(&self.columns[i], &self.columns[j], self.values[(i, j)]))
            .collect();
        pairs.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
        pairs
    }

    /// Row label column followed by one numeric column per variable
    pub fn to_table(&self, decimals: u32) -> Result<Table> {
        let mut builder = Table::builder().categorical("variable", self.columns.clone());
        for (j, name) in self.columns.iter().enumerate() {
            let values = (0..self.len()).map(|i| self.values[(i, j)]).collect();
            builder = builder.column(
                Field::numeric(name.clone()).with_decimals(decimals),
                Column::Numeric(values),
            );
        }
        builder.build()
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.columns.iter().map(String::len).max().unwrap_or(0).max(6);
        write!(f, "{:width$}", "")?;
        for name in &self.columns {
            write!(f, " {name:>width$}")?;
        }
        writeln!(f)?;
        for (i, name) in self.columns.iter().enumerate() {
            write!(f, "{name:width$}")?;
            for j in 0..self.len() {
                write!(f, " {:>width$}", format_number(self.values[(i, j)], Some(3)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Qualitative strength of a coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    /// `Strong` above 0.5, `Moderate` above 0.3, otherwise `Weak`
    pub fn of(r: f64) -> Self {
        let r = r.abs();
        if r > 0.5 {
            Strength::Strong
        } else if r > 0.3 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Strong => write!(f, "Strong"),
            Strength::Moderate => write!(f, "Moderate"),
            Strength::Weak => write!(f, "Weak"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "positive"),
            Direction::Negative => write!(f, "negative"),
        }
    }
}

/// One off-diagonal coefficient with its interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub a: String,
    pub b: String,
    pub r: f64,
    pub strength: Strength,
    pub direction: Direction,
}

impl CorrelationPair {
    fn new(a: &str, b: &str, r: f64) -> Self {
        Self {
            a: a.to_string(),
            b: b.to_string(),
            r,
            strength: Strength::of(r),
            direction: if r < 0.0 {
                Direction::Negative
            } else {
                Direction::Positive
            },
        }
    }
}

/// Pearson correlation between every pair of the given numeric columns
///
/// An empty `columns` slice selects every numeric column of the table.
/// Only the upper triangle is computed; the lower triangle mirrors it.
#[instrument(skip(table), fields(rows = table.n_rows()), level = "debug")]
pub fn correlation_matrix(
    table: &Table,
    columns: &[&str],
    policy: ZeroVariancePolicy,
) -> Result<CorrelationMatrix> {
    let names: Vec<&str> = if columns.is_empty() {
        table.numeric_columns()
    } else {
        columns.to_vec()
    };
    let data = names
        .iter()
        .map(|name| table.numeric(name))
        .collect::<Result<Vec<_>>>()?;

    if table.n_rows() < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: table.n_rows(),
        });
    }

    let n = names.len();
    let mut values = DMatrix::from_element(n, n, 1.0);
    for i in 0..n {
        for j in (i + 1)..n {
            let r = match pearson_raw(data[i], data[j]) {
                Some(r) => r,
                None => {
                    let message = format!(
                        "correlation between '{}' and '{}' involves a zero-variance column",
                        names[i], names[j]
                    );
                    warn!(a = names[i], b = names[j], ?policy, "zero-variance correlation");
                    undefined(policy, message)?
                }
            };
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }
    debug!(variables = n, "correlation matrix computed");

    Ok(CorrelationMatrix {
        columns: names.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table() -> Table {
        Table::builder()
            .numeric("x", vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .numeric("up", vec![2.0, 4.0, 6.0, 8.0, 10.0])
            .numeric("down", vec![5.0, 4.0, 3.0, 2.0, 1.0])
            .numeric("flat", vec![7.0; 5])
            .categorical("label", vec!["a", "b", "c", "d", "e"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_pearson_basic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_abs_diff_eq!(pearson(&x, &y, ZeroVariancePolicy::Strict).unwrap(), 1.0, epsilon = 1e-12);

        let y = [5.0, 3.0, 4.0, 1.0, 2.0];
        assert_abs_diff_eq!(pearson(&x, &y, ZeroVariancePolicy::Strict).unwrap(), -0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_errors() {
        assert!(matches!(
            pearson(&[1.0], &[2.0], ZeroVariancePolicy::Nan),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
        assert!(pearson(&[1.0, 2.0], &[1.0], ZeroVariancePolicy::Nan).is_err());
    }

    #[test]
    fn test_zero_variance_policies() {
        let x = [1.0, 2.0, 3.0];
        let flat = [4.0, 4.0, 4.0];
        assert!(pearson(&x, &flat, ZeroVariancePolicy::Nan).unwrap().is_nan());
        assert_eq!(pearson(&x, &flat, ZeroVariancePolicy::Zero).unwrap(), 0.0);
        assert!(matches!(
            pearson(&x, &flat, ZeroVariancePolicy::Strict),
            Err(Error::ComputationUndefined(_))
        ));
    }

    #[test]
    fn test_matrix_defaults_to_numeric_columns() {
        let m = correlation_matrix(&table(), &[], ZeroVariancePolicy::default()).unwrap();
        assert_eq!(m.columns(), &["x", "up", "down", "flat"]);
        assert!(m.is_symmetric());
        assert_abs_diff_eq!(m.get("x", "up").unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get("down", "x").unwrap(), -1.0, epsilon = 1e-12);
        assert!(m.get("x", "flat").unwrap().is_nan());
        assert_eq!(m.get("flat", "flat"), Some(1.0));
    }

    #[test]
    fn test_matrix_strict_policy_fails() {
        let err = correlation_matrix(&table(), &["x", "flat"], ZeroVariancePolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("flat"));
    }

    #[test]
    fn test_matrix_rejects_categorical_and_short_tables() {
        assert!(matches!(
            correlation_matrix(&table(), &["x", "label"], ZeroVariancePolicy::Nan),
            Err(Error::Format(_))
        ));
        let short = table().head(1);
        assert!(matches!(
            correlation_matrix(&short, &[], ZeroVariancePolicy::Nan),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_ranked_pairs() {
        let m = correlation_matrix(&table(), &["x", "up", "down", "flat"], ZeroVariancePolicy::Nan).unwrap();
        let pairs = m.ranked_pairs();
        // NaN pairs with "flat" are left out
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.strength == Strength::Strong));
        assert_eq!(pairs.iter().filter(|p| p.direction == Direction::Negative).count(), 2);
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(Strength::of(0.51), Strength::Strong);
        assert_eq!(Strength::of(-0.5), Strength::Moderate);
        assert_eq!(Strength::of(0.31), Strength::Moderate);
        assert_eq!(Strength::of(0.3), Strength::Weak);
        assert_eq!(Strength::Strong.to_string(), "Strong");
    }

    #[test]
    fn test_to_table_precision() {
        let m = correlation_matrix(&table(), &["x", "flat"], ZeroVariancePolicy::Nan).unwrap();
        let csv = String::from_utf8(m.to_table(6).unwrap().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "variable,x,flat\nx,1.000000,NaN\nflat,NaN,1.000000\n");
    }
}
