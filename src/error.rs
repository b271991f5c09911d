//! Error type shared by the loader, the HTTP collaborators and the
//! repositories.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Debug, Error)]
pub enum LoaderError {
    /// The loader was invoked without enough configuration to run.
    #[error("{0}")]
    Configuration(String),

    /// The search backend or a topic page could not be reached, or answered
    /// with a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// A response did not have the shape we rely on.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for LoaderError {
    fn from(err: reqwest::Error) -> Self {
        LoaderError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Parse(err.to_string())
    }
}
