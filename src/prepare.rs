//! Feature preparation for trip records.
//!
//! Preparation derives the trip duration, drops trips outside the duration
//! window and renders the categorical columns as labels the encoder can use
//! directly. It is a pure transform: no I/O, deterministic, and rows that
//! survive keep their relative order.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, TimeUnit};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::{BatchFilter, DurationWindowFilter};
use crate::records::{PreparedRecord, TripRecord, prepared_records_from_batch, trip_records_to_batch};
use crate::schema::{
    self, CATEGORICAL_COLUMNS, DROPOFF_TIME_COLUMN, DURATION_COLUMN, MISSING_CATEGORY,
    PICKUP_TIME_COLUMN, categorical_strings, finer_unit, ticks_per_second, timestamp_ticks,
    timestamp_unit, validate_trip_schema,
};

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Minutes between two instants given as ticks of `unit` since the epoch
#[must_use]
pub fn elapsed_minutes(pickup: i64, dropoff: i64, unit: TimeUnit) -> f64 {
    let seconds = dropoff.saturating_sub(pickup) as f64 / ticks_per_second(unit) as f64;
    seconds / SECONDS_PER_MINUTE
}

/// Minutes between two instants given in microseconds since the epoch
#[must_use]
pub fn duration_minutes(pickup_micros: i64, dropoff_micros: i64) -> f64 {
    elapsed_minutes(pickup_micros, dropoff_micros, TimeUnit::Microsecond)
}

/// Whether a duration is inside the inclusive window kept for scoring
#[must_use]
pub fn within_duration_window(minutes: f64) -> bool {
    DurationWindowFilter::default().contains(minutes)
}

/// Label for a categorical value, with the sentinel standing in for a missing one
#[must_use]
pub fn categorical_label(value: Option<i64>) -> String {
    value.unwrap_or(MISSING_CATEGORY).to_string()
}

/// Turns raw trip tables into feature-ready tables
#[derive(Debug, Clone)]
pub struct DataPreparer {
    categorical: Vec<String>,
    window: DurationWindowFilter,
}

impl Default for DataPreparer {
    fn default() -> Self {
        Self::new(CATEGORICAL_COLUMNS)
    }
}

impl DataPreparer {
    /// Create a preparer that renders the given columns as categorical labels
    pub fn new<I, S>(categorical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categorical: categorical.into_iter().map(Into::into).collect(),
            window: DurationWindowFilter::default(),
        }
    }

    /// Columns rendered as categorical labels
    #[must_use]
    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// Prepare one trip table
    ///
    /// Columns other than the timestamps, the categorical columns and
    /// `duration` pass through untouched. A `duration` column already present
    /// is recomputed in place, so preparing a prepared table is a no-op.
    pub fn prepare(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        validate_trip_schema(&batch.schema(), &self.categorical)?;

        let with_duration = with_duration_column(batch)?;
        let in_window = self.window.filter(&with_duration)?;

        self.categorical
            .iter()
            .try_fold(in_window, |batch, column| {
                let rendered = categorical_strings(schema::column(&batch, column)?, column)?;
                schema::upsert_column(&batch, Field::new(column, DataType::Utf8, false), rendered)
            })
    }

    /// Prepare every batch of a table, dropping batches left empty
    pub fn prepare_batches(&self, batches: &[RecordBatch]) -> Result<Vec<RecordBatch>> {
        let mut prepared = Vec::with_capacity(batches.len());
        for batch in batches {
            let batch = self.prepare(batch)?;
            if batch.num_rows() > 0 {
                prepared.push(batch);
            }
        }
        Ok(prepared)
    }

    /// Prepare typed trip rows
    ///
    /// Fails with a schema error unless both location columns are configured
    /// as categorical, since a [`PreparedRecord`] holds them as labels.
    pub fn prepare_records(&self, records: &[TripRecord]) -> Result<Vec<PreparedRecord>> {
        let batch = trip_records_to_batch(records)?;
        let prepared = self.prepare(&batch)?;
        prepared_records_from_batch(&prepared)
    }
}

/// Attach `duration` in minutes; a null timestamp yields a null duration
///
/// Both timestamps are brought to the finer of their two units before the
/// subtraction, so no sub-unit part of a trip is lost.
fn with_duration_column(batch: &RecordBatch) -> Result<RecordBatch> {
    let pickup = schema::column(batch, PICKUP_TIME_COLUMN)?;
    let dropoff = schema::column(batch, DROPOFF_TIME_COLUMN)?;
    let unit = finer_unit(
        timestamp_unit(pickup, PICKUP_TIME_COLUMN)?,
        timestamp_unit(dropoff, DROPOFF_TIME_COLUMN)?,
    );

    let pickup = timestamp_ticks(pickup, PICKUP_TIME_COLUMN, unit)?;
    let dropoff = timestamp_ticks(dropoff, DROPOFF_TIME_COLUMN, unit)?;

    let durations: Float64Array = pickup
        .iter()
        .zip(dropoff.iter())
        .map(|(pickup, dropoff)| Some(elapsed_minutes(pickup?, dropoff?, unit)))
        .collect();

    schema::upsert_column(
        batch,
        Field::new(DURATION_COLUMN, DataType::Float64, true),
        Arc::new(durations) as ArrayRef,
    )
}
