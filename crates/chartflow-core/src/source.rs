//! Data sources: embedded literal tables, delimited files and synthetic generators
//!
//! Every source implements [`TableSource`]; [`DataSource`] is the closed set
//! of configurations a pipeline run can start from.

use crate::synthetic::{SegmentedSpec, SyntheticSpec};
use crate::table::{Column, Field, Table};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Anything that can produce a [`Table`]
pub trait TableSource {
    /// Produce the table; the result is never mutated afterwards
    fn load(&self) -> Result<Table>;

    /// Short description used in logs
    fn describe(&self) -> String;
}

/// Configuration of where a run's table comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataSource {
    /// CSV text embedded in the program
    Literal(LiteralSource),
    /// Delimited file on disk
    File(FileSource),
    /// Seeded column-wise generator
    Synthetic(SyntheticSpec),
    /// Seeded per-segment generator
    Segmented(SegmentedSpec),
}

impl TableSource for DataSource {
    fn load(&self) -> Result<Table> {
        match self {
            DataSource::Literal(s) => s.load(),
            DataSource::File(s) => s.load(),
            DataSource::Synthetic(s) => s.load(),
            DataSource::Segmented(s) => s.load(),
        }
    }

    fn describe(&self) -> String {
        match self {
            DataSource::Literal(s) => s.describe(),
            DataSource::File(s) => s.describe(),
            DataSource::Synthetic(s) => s.describe(),
            DataSource::Segmented(s) => s.describe(),
        }
    }
}

/// CSV text with a header row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralSource {
    pub text: String,
}

impl LiteralSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TableSource for LiteralSource {
    #[instrument(skip(self), level = "debug")]
    fn load(&self) -> Result<Table> {
        if self.text.trim().is_empty() {
            return Err(Error::Parse("literal table is empty".to_string()));
        }
        parse_delimited(self.text.as_bytes(), b',').map_err(|e| match e {
            ParseFailure::Malformed(msg) => Error::Parse(msg),
            ParseFailure::Io(err) => Error::Io(err),
        })
    }

    fn describe(&self) -> String {
        format!("literal table ({} bytes)", self.text.len())
    }
}

/// Delimited file on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub path: PathBuf,
    pub delimiter: u8,
}

impl FileSource {
    /// Comma-delimited file
    pub fn csv(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl TableSource for FileSource {
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    fn load(&self) -> Result<Table> {
        let file = std::fs::File::open(&self.path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::not_found(&self.path),
            _ => Error::Io(err),
        })?;
        let table = parse_delimited(io::BufReader::new(file), self.delimiter).map_err(|e| {
            match e {
                ParseFailure::Malformed(msg) => {
                    Error::Format(format!("{}: {msg}", self.path.display()))
                }
                ParseFailure::Io(err) => Error::Io(err),
            }
        })?;
        debug!(rows = table.n_rows(), columns = table.n_columns(), "file loaded");
        Ok(table)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

enum ParseFailure {
    Malformed(String),
    Io(io::Error),
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => ParseFailure::Io(io),
                other => ParseFailure::Malformed(format!("{other:?}")),
            }
        } else {
            ParseFailure::Malformed(err.to_string())
        }
    }
}

/// Parse header plus records; a column is numeric iff every cell is a finite number
fn parse_delimited<R: io::Read>(reader: R, delimiter: u8) -> std::result::Result<Table, ParseFailure> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(ParseFailure::Malformed("missing header row".to_string()));
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(ParseFailure::Malformed(format!(
                "record {} has {} fields, header has {}",
                line + 1,
                record.len(),
                headers.len()
            )));
        }
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let mut builder = Table::builder();
    for (name, values) in headers.into_iter().zip(cells) {
        let parsed: Option<Vec<f64>> = values
            .iter()
            .map(|v| v.parse::<f64>().ok().filter(|x| x.is_finite()))
            .collect();
        builder = match parsed {
            Some(numbers) => builder.column(Field::numeric(name), Column::Numeric(numbers)),
            None => builder.column(Field::categorical(name), Column::Categorical(values)),
        };
    }
    builder
        .build()
        .map_err(|e| ParseFailure::Malformed(e.to_string()))
}
