//! One-hot encoding of feature rows against a fitted vocabulary.

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{RideDurationError, Result};
use crate::model::{FeatureEncoder, FeatureMatrix, FeatureRow, FeatureValue};

/// Separator between field name and label in one-hot feature names
pub const DEFAULT_SEPARATOR: &str = "=";

/// Dictionary vectorizer with a fixed vocabulary
///
/// A label `v` under field `k` switches on feature `k=v`; a number under `k`
/// becomes the value of feature `k`. Features outside the vocabulary are
/// dropped, so an unseen category encodes as an all-zero row.
#[derive(Debug, Clone)]
pub struct DictVectorizer {
    feature_names: Vec<String>,
    separator: String,
    vocabulary: HashMap<String, usize>,
}

impl DictVectorizer {
    /// Build from the fitted feature names, in column order
    pub fn new(feature_names: Vec<String>, separator: impl Into<String>) -> Result<Self> {
        if let Some(name) = feature_names.iter().duplicates().next() {
            return Err(RideDurationError::model(format!(
                "Duplicate feature name in vocabulary: {name}"
            )));
        }

        let vocabulary = feature_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        Ok(Self {
            feature_names,
            separator: separator.into(),
            vocabulary,
        })
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn encode_row(&self, row: &FeatureRow) -> Vec<(usize, f64)> {
        row.iter()
            .filter_map(|(field, value)| {
                let (name, x) = match value {
                    FeatureValue::Str(label) => (format!("{field}{}{label}", self.separator), 1.0),
                    FeatureValue::Num(x) => (field.clone(), *x),
                };
                self.vocabulary.get(&name).map(|&idx| (idx, x))
            })
            .collect()
    }
}

impl FeatureEncoder for DictVectorizer {
    fn transform(&self, rows: &[FeatureRow]) -> Result<FeatureMatrix> {
        let mut matrix = FeatureMatrix::new(self.feature_names.len());
        for row in rows {
            matrix.push_row(self.encode_row(row))?;
        }
        Ok(matrix)
    }
}
