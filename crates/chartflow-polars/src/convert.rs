//! Conversion between chartflow tables and Polars DataFrames

use crate::{Error, Result};
use chartflow_core::table::Column as TableColumn;
use chartflow_core::{Field, Table};
use polars::prelude::*;

/// Table to DataFrame; numeric columns become `Float64`, categorical `String`
///
/// Declared precisions do not survive the conversion.
pub fn to_data_frame(table: &Table) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.n_columns());
    for field in table.fields() {
        let name = field.name.as_str();
        let series = match table.column(name)? {
            TableColumn::Numeric(values) => Series::new(name.into(), values.as_slice()),
            TableColumn::Categorical(values) => Series::new(name.into(), values.as_slice()),
        };
        columns.push(series.into());
    }
    Ok(DataFrame::new(columns)?)
}

/// DataFrame to Table
///
/// Float and integer columns become numeric (nulls as NaN); string columns
/// become categorical (nulls as empty strings). Other types are rejected.
pub fn from_data_frame(df: &DataFrame) -> Result<Table> {
    let mut builder = Table::builder();
    for column in df.get_columns() {
        let name = column.name().as_str();
        builder = match column.dtype() {
            DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::Int16
            | DataType::Int8 | DataType::UInt64 | DataType::UInt32 | DataType::UInt16 | DataType::UInt8 => {
                let float_column = column.cast(&DataType::Float64)?;
                let values = float_column
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect();
                builder.column(Field::numeric(name), TableColumn::Numeric(values))
            }
            DataType::String => {
                let values = column
                    .str()?
                    .into_iter()
                    .map(|v| v.unwrap_or_default().to_string())
                    .collect();
                builder.column(Field::categorical(name), TableColumn::Categorical(values))
            }
            dt => {
                return Err(Error::UnsupportedDtype {
                    column: name.to_string(),
                    dtype: dt.to_string(),
                });
            }
        };
    }
    Ok(builder.build()?)
}
