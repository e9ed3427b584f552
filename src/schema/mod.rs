//! Column layout of the trip and prediction tables.
//!
//! The physical column names follow the yellow taxi trip data, which are also
//! the keys the feature encoder was fitted on.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;

use crate::error::{RideDurationError, Result};

pub mod adapt;

pub use adapt::{
    TypeCompatibility, categorical_strings, check_type_compatibility, finer_unit, is_numeric,
    is_string, location_ids, ticks_per_second, timestamp_micros, timestamp_ticks, timestamp_unit,
    validate_trip_schema,
};

/// Pickup location id column
pub const PICKUP_LOCATION_COLUMN: &str = "PULocationID";
/// Dropoff location id column
pub const DROPOFF_LOCATION_COLUMN: &str = "DOLocationID";
/// Pickup timestamp column
pub const PICKUP_TIME_COLUMN: &str = "tpep_pickup_datetime";
/// Dropoff timestamp column
pub const DROPOFF_TIME_COLUMN: &str = "tpep_dropoff_datetime";
/// Derived trip duration in minutes
pub const DURATION_COLUMN: &str = "duration";
/// Synthetic ride identifier
pub const RIDE_ID_COLUMN: &str = "ride_id";
/// Model output
pub const PREDICTION_COLUMN: &str = "predicted_duration";

/// Fields treated as categorical labels by the encoder
pub const CATEGORICAL_COLUMNS: [&str; 2] = [PICKUP_LOCATION_COLUMN, DROPOFF_LOCATION_COLUMN];

/// Substitute for a missing categorical value
pub const MISSING_CATEGORY: i64 = -1;

/// Schema of a typed trip table as written by [`crate::records::trip_records_to_batch`]
#[must_use]
pub fn trip_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(PICKUP_LOCATION_COLUMN, DataType::Int64, true),
        Field::new(DROPOFF_LOCATION_COLUMN, DataType::Int64, true),
        Field::new(
            PICKUP_TIME_COLUMN,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new(
            DROPOFF_TIME_COLUMN,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
    ]))
}

/// Schema of the prediction table
#[must_use]
pub fn output_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(RIDE_ID_COLUMN, DataType::Utf8, false),
        Field::new(PREDICTION_COLUMN, DataType::Float64, false),
    ]))
}

/// Look up a column by name
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| RideDurationError::schema(format!("Column {name} not found in batch")))
}

/// Replace the column called `field.name()`, or append it when absent
pub fn upsert_column(batch: &RecordBatch, field: Field, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns = batch.columns().to_vec();

    match schema.index_of(field.name()) {
        Ok(idx) => {
            fields[idx] = field;
            columns[idx] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
