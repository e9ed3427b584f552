//! Loading a fitted model from its JSON artifact.
//!
//! The artifact holds the encoder and the predictor in sequence:
//!
//! ```json
//! {
//!   "encoder": {"type": "dict_vectorizer", "feature_names": ["DOLocationID=1", "PULocationID=1"]},
//!   "predictor": {"type": "linear_regression", "coefficients": [1.5, -0.25], "intercept": 12.0}
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::error::util::safe_read_to_string;
use crate::model::dict_vectorizer::DEFAULT_SEPARATOR;
use crate::model::{DictVectorizer, LinearRegression, Model};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Serialized form of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub encoder: EncoderArtifact,
    pub predictor: PredictorArtifact,
}

/// Serialized feature encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderArtifact {
    DictVectorizer {
        feature_names: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
}

/// Serialized predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredictorArtifact {
    LinearRegression { coefficients: Vec<f64>, intercept: f64 },
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl ModelArtifact {
    /// Parse an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the runtime model
    pub fn into_model(self) -> Result<Model> {
        let encoder = match self.encoder {
            EncoderArtifact::DictVectorizer {
                feature_names,
                separator,
            } => DictVectorizer::new(feature_names, separator)?,
        };
        let predictor = match self.predictor {
            PredictorArtifact::LinearRegression {
                coefficients,
                intercept,
            } => LinearRegression::new(coefficients, intercept),
        };

        Ok(Model::new(encoder, predictor))
    }
}

/// Read and build the model stored at `path`
pub fn load_model(path: &Path) -> Result<Model> {
    let start = std::time::Instant::now();
    log_operation_start("Loading model artifact", path.display());

    let json = safe_read_to_string(path, "model artifact")?;
    let artifact = ModelArtifact::from_json(&json)?;
    let n_features = match &artifact.encoder {
        EncoderArtifact::DictVectorizer { feature_names, .. } => feature_names.len(),
    };
    let model = artifact.into_model()?;

    log_operation_complete("loaded", path.display(), n_features, Some(start.elapsed()));
    Ok(model)
}
