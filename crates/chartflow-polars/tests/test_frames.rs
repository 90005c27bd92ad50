//! Round trips and aggregations on DataFrames

mod common;

use approx::assert_abs_diff_eq;
use common::{create_test_df, extract_value};
use chartflow_core::ColumnKind;
use chartflow_polars::{from_data_frame, to_data_frame, CategoryOrder, ChartflowFrameExt, Error, ZeroVariancePolicy};
use polars::prelude::*;

#[test]
fn test_frame_to_table_kinds() {
    let table = create_test_df().to_table().unwrap();
    assert_eq!(table.n_rows(), 5);
    assert_eq!(table.field("department").unwrap().kind, ColumnKind::Categorical);
    // integers are widened to f64
    assert_eq!(table.numeric("years").unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0]);

    let back = to_data_frame(&table).unwrap();
    assert_eq!(back.shape(), (5, 3));
    assert_eq!(back.column("years").unwrap().dtype(), &DataType::Float64);
    assert_eq!(from_data_frame(&back).unwrap(), table);
}

#[test]
fn test_correlation_frame() {
    let result = create_test_df()
        .correlation(&["score", "years"], ZeroVariancePolicy::Nan)
        .unwrap();
    assert_eq!(result.shape(), (2, 3));
    assert_abs_diff_eq!(extract_value(&result, "score", 0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(extract_value(&result, "years", 1), 1.0, epsilon = 1e-12);
    // score falls as years grows in the last rows: r = -0.6
    assert_abs_diff_eq!(extract_value(&result, "years", 0), -0.6, epsilon = 1e-6);
}

#[test]
fn test_frequency_frame() {
    let result = create_test_df()
        .frequency("department", &CategoryOrder::ByCount)
        .unwrap();
    assert_eq!(result.shape(), (3, 3));
    let first = result.column("category").unwrap().str().unwrap().get(0);
    assert_eq!(first, Some("IT"));
    assert_abs_diff_eq!(extract_value(&result, "count", 0), 3.0);
    assert_abs_diff_eq!(extract_value(&result, "percent", 0), 60.0);
}

#[test]
fn test_grouped_sum_frame() {
    let result = create_test_df().grouped_sum(&["department"], "years").unwrap();
    assert_eq!(result.shape(), (3, 2));
    // keys sorted: IT, Marketing, Sales
    assert_abs_diff_eq!(extract_value(&result, "total", 0), 9.0);
    assert_abs_diff_eq!(extract_value(&result, "total", 2), 4.0);
}

#[test]
fn test_unknown_column() {
    let err = create_test_df().frequency("region", &CategoryOrder::ByCount).unwrap_err();
    assert!(matches!(err, Error::InvalidColumn(ref c) if c == "region"));
}

#[test]
fn test_unsupported_dtype() {
    let df = df!["flag" => [true, false]].unwrap();
    assert!(matches!(df.to_table(), Err(Error::UnsupportedDtype { .. })));
}
