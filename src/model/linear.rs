//! Linear regression over a sparse feature matrix.

use crate::error::{RideDurationError, Result};
use crate::model::{FeatureMatrix, Predictor};

/// Fitted linear model: `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    #[must_use]
    pub const fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Predictor for LinearRegression {
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        if matrix.n_features() != self.coefficients.len() {
            return Err(RideDurationError::model(format!(
                "Matrix has {} features but the regression has {} coefficients",
                matrix.n_features(),
                self.coefficients.len()
            )));
        }

        Ok(matrix
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .fold(self.intercept, |acc, &(idx, x)| acc + self.coefficients[idx] * x)
            })
            .collect())
    }
}
