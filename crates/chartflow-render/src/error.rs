//! Error types for chartflow-render

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chartflow core error: {0}")]
    Core(#[from] chartflow_core::Error),

    #[error("Drawing error: {0}")]
    Drawing(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    #[error("Invalid chart: {0}")]
    InvalidChart(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Drawing(err.to_string())
    }
}
