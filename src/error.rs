//! Error types for roomiq.

use thiserror::Error;

/// Result type for roomiq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for roomiq operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No parseable structured span was found in the model response.
    ///
    /// Recoverable: callers treat this as "zero rooms detected, with reason"
    /// rather than a pipeline failure.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Extractor output was not a sequence of records at all.
    ///
    /// Fatal for the affected case only; other cases in a batch run are
    /// unaffected.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bounding box coordinates violate the geometric invariants.
    #[error("Invalid bounding box: {0}")]
    Geometry(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Fixture loading/parsing error.
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an extraction error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Error::Extraction(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::Geometry(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a fixture error.
    pub fn fixture(msg: impl Into<String>) -> Self {
        Error::Fixture(msg.into())
    }
}
