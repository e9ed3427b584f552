use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Float64Array, Int64Array, TimestampMicrosecondArray,
    TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Float64Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use ride_duration::records::trip_records_to_batch;
use ride_duration::{DataPreparer, RideDurationError, TripRecord};

use crate::utils::{assert_close, dt, example_batch, example_records, trip};

fn labels(batch: &RecordBatch, column: &str) -> Vec<String> {
    batch
        .column_by_name(column)
        .unwrap()
        .as_string::<i32>()
        .iter()
        .map(|v| v.unwrap().to_string())
        .collect()
}

fn durations(batch: &RecordBatch) -> Vec<f64> {
    batch
        .column_by_name("duration")
        .unwrap()
        .as_primitive::<Float64Type>()
        .values()
        .to_vec()
}

#[test]
fn test_worked_example_records() {
    let prepared = DataPreparer::default()
        .prepare_records(&example_records())
        .unwrap();

    assert_eq!(prepared.len(), 2);

    assert_eq!(prepared[0].pickup_location_id, "-1");
    assert_eq!(prepared[0].dropoff_location_id, "-1");
    assert_eq!(prepared[0].pickup_datetime, dt(1, 1, 0));
    assert_eq!(prepared[0].dropoff_datetime, dt(1, 10, 0));
    assert_close(prepared[0].duration, 9.0);

    assert_eq!(prepared[1].pickup_location_id, "1");
    assert_eq!(prepared[1].dropoff_location_id, "1");
    assert_close(prepared[1].duration, 8.0);
}

#[test]
fn test_worked_example_columnar() {
    let prepared = DataPreparer::default().prepare(&example_batch()).unwrap();

    assert_eq!(prepared.num_rows(), 2);
    assert_eq!(labels(&prepared, "PULocationID"), vec!["-1", "1"]);
    assert_eq!(labels(&prepared, "DOLocationID"), vec!["-1", "1"]);
    assert_eq!(durations(&prepared), vec![9.0, 8.0]);

    let schema = prepared.schema();
    assert_eq!(
        schema.field_with_name("PULocationID").unwrap().data_type(),
        &DataType::Utf8
    );
    assert_eq!(
        schema.field_with_name("duration").unwrap().data_type(),
        &DataType::Float64
    );
}

#[test]
fn test_window_boundaries_are_inclusive() {
    let records = vec![
        trip(Some(1), Some(2), 60),
        trip(Some(3), Some(4), 3600),
        trip(Some(5), Some(6), 59),
        trip(Some(7), Some(8), 3601),
    ];

    let prepared = DataPreparer::default().prepare_records(&records).unwrap();

    let kept: Vec<(&str, f64)> = prepared
        .iter()
        .map(|r| (r.pickup_location_id.as_str(), r.duration))
        .collect();
    assert_eq!(kept, vec![("1", 1.0), ("3", 60.0)]);
}

#[test]
fn test_overnight_and_negative_trips_are_dropped() {
    let records = vec![
        // dropoff the next day
        TripRecord::new(
            Some(1),
            Some(1),
            dt(23, 50, 0),
            dt(23, 55, 0) + chrono::Duration::days(1),
        ),
        // dropoff before pickup
        TripRecord::new(Some(2), Some(2), dt(1, 10, 0), dt(1, 0, 0)),
        trip(Some(3), Some(3), 600),
    ];

    let prepared = DataPreparer::default().prepare_records(&records).unwrap();

    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].pickup_location_id, "3");
    assert_close(prepared[0].duration, 10.0);
}

#[test]
fn test_all_rows_dropped_gives_empty_table() {
    let records = vec![trip(Some(1), Some(1), 10), trip(None, None, 7200)];

    let batch = trip_records_to_batch(&records).unwrap();
    let prepared = DataPreparer::default().prepare(&batch).unwrap();
    assert_eq!(prepared.num_rows(), 0);

    let preparer = DataPreparer::default();
    assert!(preparer.prepare_batches(&[batch]).unwrap().is_empty());
}

#[test]
fn test_prepare_is_idempotent() {
    let preparer = DataPreparer::default();
    let once = preparer.prepare(&example_batch()).unwrap();
    let twice = preparer.prepare(&once).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_extra_columns_pass_through_in_order() {
    let batch = example_batch();
    let distance: ArrayRef = Arc::new(Float64Array::from(vec![1.1, 2.2, 3.3, 4.4]));
    let mut fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(Field::new("trip_distance", DataType::Float64, false));
    let mut columns = batch.columns().to_vec();
    columns.push(distance);
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

    let prepared = DataPreparer::default().prepare(&batch).unwrap();

    let distances = prepared
        .column_by_name("trip_distance")
        .unwrap()
        .as_primitive::<Float64Type>();
    assert_eq!(distances.values().to_vec(), vec![1.1, 2.2]);
}

#[test]
fn test_float_location_ids() {
    // Nullable integer columns often arrive as floats
    let pickup_times = TimestampMicrosecondArray::from(vec![
        dt(1, 0, 0).and_utc().timestamp_micros(),
        dt(1, 0, 0).and_utc().timestamp_micros(),
    ]);
    let dropoff_times = TimestampMicrosecondArray::from(vec![
        dt(1, 5, 0).and_utc().timestamp_micros(),
        dt(1, 30, 0).and_utc().timestamp_micros(),
    ]);
    let schema = Schema::new(vec![
        Field::new("PULocationID", DataType::Float64, true),
        Field::new("DOLocationID", DataType::Float64, true),
        Field::new(
            "tpep_pickup_datetime",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new(
            "tpep_dropoff_datetime",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Float64Array::from(vec![Some(132.0), None])) as ArrayRef,
            Arc::new(Float64Array::from(vec![Some(f64::NAN), Some(48.0)])),
            Arc::new(pickup_times),
            Arc::new(dropoff_times),
        ],
    )
    .unwrap();

    let prepared = DataPreparer::default().prepare(&batch).unwrap();

    assert_eq!(labels(&prepared, "PULocationID"), vec!["132", "-1"]);
    assert_eq!(labels(&prepared, "DOLocationID"), vec!["-1", "48"]);
    assert_eq!(prepared.column_by_name("PULocationID").unwrap().null_count(), 0);
}

#[test]
fn test_missing_timestamp_column_is_a_schema_error() {
    let batch = example_batch();
    let trimmed = batch.project(&[0, 1, 2]).unwrap();

    let err = DataPreparer::default().prepare(&trimmed).unwrap_err();
    assert!(matches!(err, RideDurationError::Schema(_)));
}

#[test]
fn test_custom_categorical_columns() {
    let preparer = DataPreparer::new(["PULocationID"]);
    let prepared = preparer.prepare(&example_batch()).unwrap();

    assert_eq!(labels(&prepared, "PULocationID"), vec!["-1", "1"]);
    // Not configured as categorical, so left as integers
    assert_eq!(
        prepared.column_by_name("DOLocationID").unwrap().data_type(),
        &DataType::Int64
    );
}

fn timestamp_batch(pickup: ArrayRef, dropoff: ArrayRef) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("PULocationID", DataType::Int64, true),
        Field::new("DOLocationID", DataType::Int64, true),
        Field::new("tpep_pickup_datetime", pickup.data_type().clone(), true),
        Field::new("tpep_dropoff_datetime", dropoff.data_type().clone(), true),
    ]);
    let rows = pickup.len() as i64;
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from_iter_values(0..rows)) as ArrayRef,
            Arc::new(Int64Array::from_iter_values(0..rows)),
            pickup,
            dropoff,
        ],
    )
    .unwrap()
}

#[test]
fn test_nanosecond_timestamps_keep_sub_microsecond_part() {
    let hour_ns = 3_600_000_000_000;
    let pickup = TimestampNanosecondArray::from(vec![0, 0, 0]);
    let dropoff = TimestampNanosecondArray::from(vec![hour_ns, hour_ns + 500, 60_000_000_000 - 1]);

    let prepared = DataPreparer::default()
        .prepare(&timestamp_batch(Arc::new(pickup), Arc::new(dropoff)))
        .unwrap();

    // Exactly 60 minutes stays; 500 ns over, or 1 ns under a minute, does not
    assert_eq!(labels(&prepared, "PULocationID"), vec!["0"]);
    assert_eq!(durations(&prepared), vec![60.0]);
}

#[test]
fn test_mixed_timestamp_units_use_the_finer_unit() {
    let pickup = TimestampMicrosecondArray::from(vec![0, 0]);
    let dropoff = TimestampNanosecondArray::from(vec![3_600_000_000_000, 3_600_000_000_001]);

    let prepared = DataPreparer::default()
        .prepare(&timestamp_batch(Arc::new(pickup), Arc::new(dropoff)))
        .unwrap();

    assert_eq!(labels(&prepared, "PULocationID"), vec!["0"]);
}

#[test]
fn test_null_timestamps_are_dropped() {
    let minute = 60_000_000;
    let pickup = TimestampMicrosecondArray::from(vec![None, Some(0), Some(0)]);
    let dropoff = TimestampMicrosecondArray::from(vec![Some(10 * minute), Some(10 * minute), None]);

    let prepared = DataPreparer::default()
        .prepare(&timestamp_batch(Arc::new(pickup), Arc::new(dropoff)))
        .unwrap();

    assert_eq!(labels(&prepared, "PULocationID"), vec!["1"]);
    assert_eq!(durations(&prepared), vec![10.0]);
}
