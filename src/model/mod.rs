//! Pre-fit feature encoder and predictor.
//!
//! A trained model is a pair: an encoder that turns feature rows into a
//! numeric matrix, and a predictor that maps that matrix to one value per row.
//! Both sit behind traits so a batch run can be exercised with stubs.

use std::collections::BTreeMap;
use std::fmt;

pub mod artifact;
pub mod dict_vectorizer;
pub mod features;
pub mod linear;

pub use artifact::{EncoderArtifact, ModelArtifact, PredictorArtifact, load_model};
pub use dict_vectorizer::DictVectorizer;
pub use features::feature_rows;
pub use linear::LinearRegression;

use crate::error::{RideDurationError, Result};

/// A single feature value as seen by the encoder
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Categorical label
    Str(String),
    /// Numeric value
    Num(f64),
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

/// Field name to value mapping for one record
pub type FeatureRow = BTreeMap<String, FeatureValue>;

/// Sparse row-major matrix produced by an encoder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

impl FeatureMatrix {
    /// An empty matrix with `n_features` columns
    #[must_use]
    pub const fn new(n_features: usize) -> Self {
        Self {
            n_features,
            rows: Vec::new(),
        }
    }

    /// Append a row of `(column, value)` entries
    pub fn push_row(&mut self, mut entries: Vec<(usize, f64)>) -> Result<()> {
        if let Some(&(column, _)) = entries.iter().find(|(column, _)| *column >= self.n_features) {
            return Err(RideDurationError::model(format!(
                "Feature column {column} out of range for a matrix with {} features",
                self.n_features
            )));
        }
        entries.sort_unstable_by_key(|(column, _)| *column);
        self.rows.push(entries);
        Ok(())
    }

    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Non-zero entries of each row, sorted by column
    #[must_use]
    pub fn rows(&self) -> &[Vec<(usize, f64)>] {
        &self.rows
    }
}

/// Turns feature rows into a numeric matrix
pub trait FeatureEncoder: fmt::Debug {
    fn transform(&self, rows: &[FeatureRow]) -> Result<FeatureMatrix>;
}

/// Maps a numeric matrix to one prediction per row
pub trait Predictor: fmt::Debug {
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// An encoder and predictor fitted together
#[derive(Debug)]
pub struct Model {
    encoder: Box<dyn FeatureEncoder + Send + Sync>,
    predictor: Box<dyn Predictor + Send + Sync>,
}

impl Model {
    pub fn new(
        encoder: impl FeatureEncoder + Send + Sync + 'static,
        predictor: impl Predictor + Send + Sync + 'static,
    ) -> Self {
        Self {
            encoder: Box::new(encoder),
            predictor: Box::new(predictor),
        }
    }

    #[must_use]
    pub fn encoder(&self) -> &(dyn FeatureEncoder + Send + Sync) {
        self.encoder.as_ref()
    }

    #[must_use]
    pub fn predictor(&self) -> &(dyn Predictor + Send + Sync) {
        self.predictor.as_ref()
    }

    /// Encode the rows and predict, checking that every row got a prediction
    pub fn predict_rows(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        let matrix = self.encoder.transform(rows)?;
        let predictions = self.predictor.predict(&matrix)?;

        if predictions.len() != rows.len() {
            return Err(RideDurationError::model(format!(
                "Predictor returned {} values for {} rows",
                predictions.len(),
                rows.len()
            )));
        }

        Ok(predictions)
    }
}
