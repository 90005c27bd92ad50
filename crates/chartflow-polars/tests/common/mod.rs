//! Common test utilities for chartflow-polars tests

use polars::prelude::*;

/// Frame with one categorical and two numeric columns
pub fn create_test_df() -> DataFrame {
    df![
        "department" => ["IT", "Marketing", "IT", "Sales", "IT"],
        "score" => [3.0, 4.0, 5.0, 2.0, 1.0],
        "years" => [1i64, 2, 3, 4, 5],
    ]
    .unwrap()
}

/// Single f64 value from a result frame
pub fn extract_value(df: &DataFrame, col_name: &str, row: usize) -> f64 {
    df.column(col_name)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
        .unwrap()
}
