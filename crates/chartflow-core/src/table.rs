//! Column-major tables of named scalar columns
//!
//! A [`Table`] is built once through [`TableBuilder`] and never mutated
//! afterwards. Every column has the same length; names are unique.

use crate::numeric::format_number;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io;

/// Kind of values held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Floating point values
    Numeric,
    /// Category labels or free text
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Declared valid range of a numeric column, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Create a range; `min` must not exceed `max`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(Error::InvalidParameter(format!(
                "range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Clip a value into the range
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Check whether a value lies in the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Schema entry for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: ColumnKind,
    /// Valid range used when clipping synthetic values
    pub range: Option<ValueRange>,
    /// Fixed decimal precision used when the column is serialized
    pub decimals: Option<u32>,
}

impl Field {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
            range: None,
            decimals: None,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
            range: None,
            decimals: None,
        }
    }

    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

/// Values of one column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    fn scalar(&self, index: usize) -> Option<Scalar<'_>> {
        match self {
            Column::Numeric(v) => v.get(index).map(|&x| Scalar::Number(x)),
            Column::Categorical(v) => v.get(index).map(|s| Scalar::Text(s.as_str())),
        }
    }

    fn take(&self, n: usize) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(v.iter().take(n).copied().collect()),
            Column::Categorical(v) => Column::Categorical(v.iter().take(n).cloned().collect()),
        }
    }
}

/// A single cell value borrowed from a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Number(f64),
    Text(&'a str),
}

impl Scalar<'_> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(x) => Some(*x),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Number(_) => None,
            Scalar::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(x) => write!(f, "{}", format_number(*x, None)),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the named column in this row
    pub fn get(&self, name: &str) -> Option<Scalar<'a>> {
        let idx = self.table.position(name)?;
        self.table.columns[idx].scalar(self.index)
    }

    /// `(column name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Scalar<'a>)> + 'a {
        let table = self.table;
        let index = self.index;
        table
            .fields
            .iter()
            .zip(table.columns.iter())
            .filter_map(move |(field, column)| {
                column.scalar(index).map(|s| (field.name.as_str(), s))
            })
    }
}

/// An immutable, ordered table of rows sharing one column set
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    fields: Vec<Field>,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Names of all numeric columns in schema order
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.kind == ColumnKind::Numeric)
            .map(|f| f.name.as_str())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Values of a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(Error::column_kind(name, "numeric")),
        }
    }

    /// Values of a categorical column
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Ok(v),
            Column::Numeric(_) => Err(Error::column_kind(name, "categorical")),
        }
    }

    /// Fail with a format error naming the first absent column
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|n| self.position(n).is_none()) {
            Some(missing) => Err(Error::missing_column(missing)),
            None => Ok(()),
        }
    }

    /// Distinct values of a categorical column in order of first appearance
    pub fn distinct(&self, name: &str) -> Result<Vec<&str>> {
        let values = self.categorical(name)?;
        let mut seen = HashSet::new();
        Ok(values
            .iter()
            .map(String::as_str)
            .filter(|v| seen.insert(*v))
            .collect())
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows).map(move |index| Row { table: self, index })
    }

    /// First `n` rows as a new table
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.rows);
        Table {
            fields: self.fields.clone(),
            columns: self.columns.iter().map(|c| c.take(n)).collect(),
            rows: n,
        }
    }

    /// Serialized form of one cell, honouring the column's declared precision
    pub fn format_cell(&self, column: usize, row: usize) -> Option<String> {
        let field = self.fields.get(column)?;
        match &self.columns[column] {
            Column::Numeric(v) => v.get(row).map(|&x| format_number(x, field.decimals)),
            Column::Categorical(v) => v.get(row).cloned(),
        }
    }

    /// Write the table as CSV: header in schema order, then one record per row
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.column_names())
            .map_err(|e| Error::Format(e.to_string()))?;
        for row in 0..self.rows {
            let record = (0..self.fields.len())
                .map(|c| self.format_cell(c, row).unwrap_or_default());
            wtr.write_record(record)
                .map_err(|e| Error::Format(e.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// The CSV serialization as bytes
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

/// Builder for [`Table`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    fields: Vec<Field>,
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Append a column with its schema entry
    pub fn column(mut self, field: Field, column: Column) -> Self {
        self.fields.push(field);
        self.columns.push(column);
        self
    }

    /// Append a numeric column without range or precision
    pub fn numeric(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.column(Field::numeric(name), Column::Numeric(values))
    }

    /// Append a categorical column
    pub fn categorical<S: Into<String>>(self, name: impl Into<String>, values: Vec<S>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.column(Field::categorical(name), Column::Categorical(values))
    }

    /// Validate the columns and produce the table
    pub fn build(self) -> Result<Table> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(Error::Format(format!("duplicate column '{}'", field.name)));
            }
        }

        for (field, column) in self.fields.iter().zip(&self.columns) {
            if field.kind != column.kind() {
                return Err(Error::Format(format!(
                    "column '{}' declared {} but holds {} values",
                    field.name,
                    field.kind,
                    column.kind()
                )));
            }
        }

        let rows = self.columns.first().map(Column::len).unwrap_or(0);
        if let Some((field, column)) = self
            .fields
            .iter()
            .zip(&self.columns)
            .find(|(_, c)| c.len() != rows)
        {
            return Err(Error::size_mismatch(
                rows,
                column.len(),
                &format!("column '{}'", field.name),
            ));
        }

        Ok(Table {
            fields: self.fields,
            columns: self.columns,
            rows,
        })
    }
}
