//! Error handling for the batch scoring pipeline.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Specialized error type for ride duration scoring
#[derive(Debug, thiserror::Error)]
pub enum RideDurationError {
    /// Error opening, reading or writing a local file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding or encoding Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error from an Arrow compute kernel or batch construction
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error talking to a remote object
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// A required column is missing or has a type we cannot adapt
    #[error("Schema error: {0}")]
    Schema(String),

    /// The encoder or predictor rejected its input
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid configuration, template or period
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed model artifact
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RideDurationError {
    /// Create a schema error from any displayable message
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a model error from any displayable message
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Create a configuration error from any displayable message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a `ureq` failure together with the URL that caused it
    pub fn http(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Http {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for ride duration operations
pub type Result<T> = std::result::Result<T, RideDurationError>;
