//! Error type of a scenario run

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] chartflow_core::Error),

    #[error(transparent)]
    Render(#[from] chartflow_render::Error),

    #[error(transparent)]
    Publish(#[from] chartflow_publish::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The underlying core error, wherever it was wrapped
    pub fn core(&self) -> Option<&chartflow_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            Error::Render(chartflow_render::Error::Core(e)) => Some(e),
            Error::Publish(chartflow_publish::Error::Core(e)) => Some(e),
            Error::Publish(chartflow_publish::Error::Render(chartflow_render::Error::Core(e))) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_found_through_wrappers() {
        let wrapped = Error::Render(chartflow_render::Error::Core(chartflow_core::Error::not_found("data.csv")));
        assert!(matches!(
            wrapped.core(),
            Some(chartflow_core::Error::InputNotFound { .. })
        ));
        assert_eq!(wrapped.to_string(), "Chartflow core error: Input not found: data.csv");

        let template = Error::Publish(chartflow_publish::Error::Template("x".to_string()));
        assert!(template.core().is_none());
    }
}
