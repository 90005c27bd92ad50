//! The closed set of reductions a run can publish

use crate::correlation::CorrelationMatrix;
use crate::frequency::FrequencyTable;
use crate::grouped::GroupedSum;
use chartflow_core::table::Table;
use chartflow_core::Result;

/// Decimals written for correlation coefficients
pub const CORRELATION_DECIMALS: u32 = 6;
/// Decimals written for frequency percentages
pub const PERCENT_DECIMALS: u32 = 2;

/// A reduced statistic derived from a table
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryResult {
    Correlation(CorrelationMatrix),
    Frequency(FrequencyTable),
    Flow(GroupedSum),
}

impl SummaryResult {
    /// Short name used in logs and manifests
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryResult::Correlation(_) => "correlation",
            SummaryResult::Frequency(_) => "frequency",
            SummaryResult::Flow(_) => "flow",
        }
    }

    /// Tabular form with a stable column order and fixed precision
    pub fn to_table(&self) -> Result<Table> {
        match self {
            SummaryResult::Correlation(m) => m.to_table(CORRELATION_DECIMALS),
            SummaryResult::Frequency(f) => f.to_table(PERCENT_DECIMALS),
            SummaryResult::Flow(g) => g.to_table(None),
        }
    }
}

impl From<CorrelationMatrix> for SummaryResult {
    fn from(m: CorrelationMatrix) -> Self {
        SummaryResult::Correlation(m)
    }
}

impl From<FrequencyTable> for SummaryResult {
    fn from(f: FrequencyTable) -> Self {
        SummaryResult::Frequency(f)
    }
}

impl From<GroupedSum> for SummaryResult {
    fn from(g: GroupedSum) -> Self {
        SummaryResult::Flow(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frequency, grouped_sum, CategoryOrder};

    #[test]
    fn test_to_table_per_kind() {
        let table = Table::builder()
            .categorical("a", vec!["x", "y", "x"])
            .numeric("v", vec![1.5, 2.0, 0.5])
            .build()
            .unwrap();

        let freq: SummaryResult = frequency(&table, "a", &CategoryOrder::ByCount).unwrap().into();
        assert_eq!(freq.kind(), "frequency");
        let names: Vec<String> = freq.to_table().unwrap().column_names().map(String::from).collect();
        assert_eq!(names, vec!["category", "count", "percent"]);

        let flow: SummaryResult = grouped_sum(&table, &["a"], "v").unwrap().into();
        let csv = String::from_utf8(flow.to_table().unwrap().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "a,total\nx,2\ny,2\n");
    }
}
