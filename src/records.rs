//! Typed trip rows and their columnar form.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::Float64Type;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};

use crate::error::{RideDurationError, Result};
use crate::prepare::duration_minutes;
use crate::schema::{
    self, DROPOFF_LOCATION_COLUMN, DROPOFF_TIME_COLUMN, DURATION_COLUMN, PICKUP_LOCATION_COLUMN,
    PICKUP_TIME_COLUMN, timestamp_micros,
};

/// One raw taxi trip as logged by the meter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub pickup_location_id: Option<i64>,
    pub dropoff_location_id: Option<i64>,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
}

impl TripRecord {
    #[must_use]
    pub const fn new(
        pickup_location_id: Option<i64>,
        dropoff_location_id: Option<i64>,
        pickup_datetime: NaiveDateTime,
        dropoff_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            pickup_location_id,
            dropoff_location_id,
            pickup_datetime,
            dropoff_datetime,
        }
    }

    /// Trip length in fractional minutes; negative when the timestamps are swapped
    #[must_use]
    pub fn duration_minutes(&self) -> f64 {
        duration_minutes(
            self.pickup_datetime.and_utc().timestamp_micros(),
            self.dropoff_datetime.and_utc().timestamp_micros(),
        )
    }
}

/// A trip that passed preparation: duration in range, locations rendered as labels
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub pickup_location_id: String,
    pub dropoff_location_id: String,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    /// Minutes between pickup and dropoff, always within 1..=60
    pub duration: f64,
}

/// Build a trip table from typed rows
pub fn trip_records_to_batch(records: &[TripRecord]) -> Result<RecordBatch> {
    let pickup_locations: Int64Array = records.iter().map(|r| r.pickup_location_id).collect();
    let dropoff_locations: Int64Array = records.iter().map(|r| r.dropoff_location_id).collect();
    let pickup_times = TimestampMicrosecondArray::from_iter_values(
        records
            .iter()
            .map(|r| r.pickup_datetime.and_utc().timestamp_micros()),
    );
    let dropoff_times = TimestampMicrosecondArray::from_iter_values(
        records
            .iter()
            .map(|r| r.dropoff_datetime.and_utc().timestamp_micros()),
    );

    let columns: Vec<ArrayRef> = vec![
        Arc::new(pickup_locations),
        Arc::new(dropoff_locations),
        Arc::new(pickup_times),
        Arc::new(dropoff_times),
    ];

    Ok(RecordBatch::try_new(schema::trip_schema(), columns)?)
}

/// Read typed rows back out of a prepared trip table
///
/// Both location columns must already be rendered as strings.
pub fn prepared_records_from_batch(batch: &RecordBatch) -> Result<Vec<PreparedRecord>> {
    let pickup_locations = label_column(batch, PICKUP_LOCATION_COLUMN)?;
    let dropoff_locations = label_column(batch, DROPOFF_LOCATION_COLUMN)?;

    let pickup_times =
        timestamp_micros(schema::column(batch, PICKUP_TIME_COLUMN)?, PICKUP_TIME_COLUMN)?;
    let dropoff_times =
        timestamp_micros(schema::column(batch, DROPOFF_TIME_COLUMN)?, DROPOFF_TIME_COLUMN)?;

    let durations = schema::column(batch, DURATION_COLUMN)?
        .as_primitive_opt::<Float64Type>()
        .ok_or_else(|| {
            RideDurationError::schema(format!("Column {DURATION_COLUMN} is not Float64"))
        })?;

    (0..batch.num_rows())
        .map(|row| {
            if durations.is_null(row) {
                return Err(null_value(DURATION_COLUMN, row));
            }

            Ok(PreparedRecord {
                pickup_location_id: label_at(pickup_locations, row, PICKUP_LOCATION_COLUMN)?,
                dropoff_location_id: label_at(dropoff_locations, row, DROPOFF_LOCATION_COLUMN)?,
                pickup_datetime: datetime_at(&pickup_times, row, PICKUP_TIME_COLUMN)?,
                dropoff_datetime: datetime_at(&dropoff_times, row, DROPOFF_TIME_COLUMN)?,
                duration: durations.value(row),
            })
        })
        .collect()
}

fn label_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    schema::column(batch, name)?
        .as_string_opt::<i32>()
        .ok_or_else(|| {
            RideDurationError::schema(format!("Column {name} is not a categorical string column"))
        })
}

fn label_at(labels: &StringArray, row: usize, column: &str) -> Result<String> {
    if labels.is_null(row) {
        return Err(null_value(column, row));
    }
    Ok(labels.value(row).to_string())
}

fn datetime_at(micros: &Int64Array, row: usize, column: &str) -> Result<NaiveDateTime> {
    if micros.is_null(row) {
        return Err(null_value(column, row));
    }
    DateTime::from_timestamp_micros(micros.value(row))
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| {
            RideDurationError::schema(format!("Column {column} row {row} is out of range"))
        })
}

fn null_value(column: &str, row: usize) -> RideDurationError {
    RideDurationError::schema(format!("Column {column} row {row} is null"))
}
