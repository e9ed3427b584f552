//! Configuration for a batch scoring run.

mod period;
mod template;

use std::path::PathBuf;

pub use period::Period;
pub use template::PathTemplate;

use crate::error::Result;
use crate::storage::StorageOptions;

/// Where the monthly trip data is published
pub const DEFAULT_INPUT_PATTERN: &str =
    "https://d37ci6vzurychx.cloudfront.net/trip-data/yellow_tripdata_{year:04d}-{month:02d}.parquet";

/// Where predictions land when no output pattern is given
pub const DEFAULT_OUTPUT_PATTERN: &str = "output/yellow_tripdata_{year:04d}-{month:02d}.parquet";

/// Default location of the model artifact
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Template for the input location
    pub input_pattern: PathTemplate,
    /// Template for the output location
    pub output_pattern: PathTemplate,
    /// Object store settings shared by reads and writes
    pub storage: StorageOptions,
    /// Path of the model artifact
    pub model_path: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_pattern: PathTemplate::new(DEFAULT_INPUT_PATTERN)
                .expect("default input pattern is valid"),
            output_pattern: PathTemplate::new(DEFAULT_OUTPUT_PATTERN)
                .expect("default output pattern is valid"),
            storage: StorageOptions::default(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl BatchConfig {
    /// Build a configuration from raw template strings
    pub fn new(
        input_pattern: &str,
        output_pattern: &str,
        storage: StorageOptions,
        model_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            input_pattern: PathTemplate::new(input_pattern)?,
            output_pattern: PathTemplate::new(output_pattern)?,
            storage,
            model_path: model_path.into(),
        })
    }

    pub fn with_input_pattern(mut self, pattern: &str) -> Result<Self> {
        self.input_pattern = PathTemplate::new(pattern)?;
        Ok(self)
    }

    pub fn with_output_pattern(mut self, pattern: &str) -> Result<Self> {
        self.output_pattern = PathTemplate::new(pattern)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.storage.endpoint_url = endpoint_url;
        self
    }

    #[must_use]
    pub fn with_model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = model_path.into();
        self
    }

    /// Input location for the given month
    pub fn input_location(&self, period: Period) -> Result<String> {
        self.input_pattern.render(period)
    }

    /// Output location for the given month
    pub fn output_location(&self, period: Period) -> Result<String> {
        self.output_pattern.render(period)
    }
}
