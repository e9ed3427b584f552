//! Inclusive window filter on a numeric column.

use arrow::array::{Array, AsArray, BooleanArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;

use crate::error::{RideDurationError, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::schema::{self, DURATION_COLUMN, is_numeric};

/// Shortest trip kept, in minutes
pub const MIN_DURATION_MINUTES: f64 = 1.0;
/// Longest trip kept, in minutes
pub const MAX_DURATION_MINUTES: f64 = 60.0;

/// Keeps rows whose `column` lies in `min..=max`
///
/// Nulls and NaN never match.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationWindowFilter {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl Default for DurationWindowFilter {
    fn default() -> Self {
        Self::new(DURATION_COLUMN, MIN_DURATION_MINUTES, MAX_DURATION_MINUTES)
    }
}

impl DurationWindowFilter {
    #[must_use]
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    /// Whether a single value falls inside the window
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Boolean mask of the rows this filter keeps
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let column = schema::column(batch, &self.column)?;
        if !is_numeric(column.data_type()) {
            return Err(RideDurationError::schema(format!(
                "Column {} has type {}, expected a numeric column",
                self.column,
                column.data_type()
            )));
        }

        let values = cast::cast(column, &DataType::Float64)?;
        let mask = values
            .as_primitive::<Float64Type>()
            .iter()
            .map(|value| Some(value.is_some_and(|v| self.contains(v))))
            .collect();

        Ok(mask)
    }
}

impl BatchFilter for DurationWindowFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.mask(batch)?;
        let filtered = filter_record_batch(batch, &mask)?;

        log::debug!(
            "Duration window [{}, {}] kept {} of {} rows",
            self.min,
            self.max,
            filtered.num_rows(),
            batch.num_rows()
        );

        Ok(filtered)
    }
}
