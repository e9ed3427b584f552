//! Where a table lives: a local file, an HTTP(S) URL or an object-store key.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{RideDurationError, Result};

/// Object store settings shared by reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageOptions {
    /// Base URL of an S3-compatible endpoint; objects are addressed path-style under it
    pub endpoint_url: Option<String>,
}

impl StorageOptions {
    #[must_use]
    pub fn with_endpoint_url(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.into()),
        }
    }
}

/// What a location resolves to once storage options are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    File(&'a Path),
    Url(String),
}

/// A parsed input or output location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Http(String),
    S3 { bucket: String, key: String },
}

impl Location {
    /// Classify a location string
    pub fn parse(location: &str) -> Result<Self> {
        if let Some(rest) = location.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() || key.is_empty() {
                return Err(RideDurationError::config(format!(
                    "Object store location needs a bucket and a key: {location}"
                )));
            }
            return Ok(Self::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(Self::Http(location.to_string()));
        }

        if location.is_empty() {
            return Err(RideDurationError::config("Empty location"));
        }

        Ok(Self::Local(PathBuf::from(location)))
    }

    /// Resolve to a local file or to the URL to fetch or upload
    #[must_use]
    pub fn resolve(&self, options: &StorageOptions) -> Resolved<'_> {
        match self {
            Self::Local(path) => Resolved::File(path),
            Self::Http(url) => Resolved::Url(url.clone()),
            Self::S3 { bucket, key } => Resolved::Url(match &options.endpoint_url {
                Some(endpoint) => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
                None => format!("https://{bucket}.s3.amazonaws.com/{key}"),
            }),
        }
    }

    /// URL to fetch or upload this location, `None` for local files
    #[must_use]
    pub fn url(&self, options: &StorageOptions) -> Option<String> {
        match self.resolve(options) {
            Resolved::File(_) => None,
            Resolved::Url(url) => Some(url),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
            Self::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
        }
    }
}
