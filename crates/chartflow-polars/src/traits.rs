//! Extension trait running chartflow aggregations on Polars DataFrames

use crate::convert::{from_data_frame, to_data_frame};
use crate::{Error, Result};
use chartflow_aggregate::summary::{CORRELATION_DECIMALS, PERCENT_DECIMALS};
use chartflow_aggregate::{correlation_matrix, frequency, grouped_sum, CategoryOrder, ZeroVariancePolicy};
use chartflow_core::Table;
use polars::prelude::*;

/// Chartflow operations on a DataFrame, each returning a new DataFrame
pub trait ChartflowFrameExt {
    /// Convert to a chartflow table
    fn to_table(&self) -> Result<Table>;

    /// Pearson correlation matrix
    ///
    /// # Arguments
    /// * `columns` - Numeric columns; all numeric columns when empty
    /// * `policy` - Treatment of zero-variance columns
    ///
    /// # Returns
    /// DataFrame with a `variable` column followed by one column per variable
    fn correlation(&self, columns: &[&str], policy: ZeroVariancePolicy) -> Result<DataFrame>;

    /// Category counts
    ///
    /// # Returns
    /// DataFrame with columns `category`, `count` and `percent`
    fn frequency(&self, column: &str, order: &CategoryOrder) -> Result<DataFrame>;

    /// Summed `value` per key tuple
    ///
    /// # Returns
    /// DataFrame with the key columns followed by `total`
    fn grouped_sum(&self, keys: &[&str], value: &str) -> Result<DataFrame>;
}

impl ChartflowFrameExt for DataFrame {
    fn to_table(&self) -> Result<Table> {
        from_data_frame(self)
    }

    fn correlation(&self, columns: &[&str], policy: ZeroVariancePolicy) -> Result<DataFrame> {
        for name in columns {
            self.column(name)
                .map_err(|_| Error::InvalidColumn(name.to_string()))?;
        }
        let matrix = correlation_matrix(&self.to_table()?, columns, policy)?;
        to_data_frame(&matrix.to_table(CORRELATION_DECIMALS)?)
    }

    fn frequency(&self, column: &str, order: &CategoryOrder) -> Result<DataFrame> {
        self.column(column)
            .map_err(|_| Error::InvalidColumn(column.to_string()))?;
        let counts = frequency(&self.to_table()?, column, order)?;
        to_data_frame(&counts.to_table(PERCENT_DECIMALS)?)
    }

    fn grouped_sum(&self, keys: &[&str], value: &str) -> Result<DataFrame> {
        for name in keys.iter().chain(std::iter::once(&value)) {
            self.column(name)
                .map_err(|_| Error::InvalidColumn(name.to_string()))?;
        }
        let sums = grouped_sum(&self.to_table()?, keys, value)?;
        to_data_frame(&sums.to_table(None)?)
    }
}
