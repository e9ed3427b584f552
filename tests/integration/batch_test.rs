use arrow::array::AsArray;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use ride_duration::records::trip_records_to_batch;
use ride_duration::{
    BatchConfig, DataPreparer, Location, Period, RideDurationError, StorageOptions, load_model,
    read_parquet, run_batch, score_batches,
};

use crate::utils::{
    LOCATION_MODEL_JSON, assert_close, constant_model, example_batch, location_model, trip,
    write_trips,
};

fn ride_ids(batches: &[RecordBatch]) -> Vec<String> {
    batches
        .iter()
        .flat_map(|b| {
            b.column_by_name("ride_id")
                .unwrap()
                .as_string::<i32>()
                .iter()
                .map(|v| v.unwrap().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn predictions(batches: &[RecordBatch]) -> Vec<f64> {
    batches
        .iter()
        .flat_map(|b| {
            b.column_by_name("predicted_duration")
                .unwrap()
                .as_primitive::<Float64Type>()
                .values()
                .to_vec()
        })
        .collect()
}

fn january() -> Period {
    Period::new(2023, 1).unwrap()
}

/// Config reading `<dir>/input/YYYY-MM.parquet` and writing `<dir>/output/YYYY-MM.parquet`
fn local_config(dir: &std::path::Path) -> BatchConfig {
    let dir = dir.display();
    BatchConfig::new(
        &format!("{dir}/input/{{year:04d}}-{{month:02d}}.parquet"),
        &format!("{dir}/output/{{year:04d}}-{{month:02d}}.parquet"),
        StorageOptions::default(),
        format!("{dir}/model.json"),
    )
    .unwrap()
}

#[test]
fn test_score_worked_example() {
    let scored = score_batches(
        &[example_batch()],
        january(),
        &constant_model(12.5),
        &DataPreparer::default(),
    )
    .unwrap();

    assert_eq!(scored.rows_read, 4);
    assert_eq!(scored.batches.len(), 1);
    assert_eq!(ride_ids(&scored.batches), vec!["2023/01_0", "2023/01_1"]);
    assert_eq!(predictions(&scored.batches), vec![12.5, 12.5]);
    assert_eq!(scored.summary.count, 2);
    assert_close(scored.summary.mean, 12.5);
    assert_close(scored.summary.std, 0.0);
}

#[test]
fn test_ride_ids_keep_source_position() {
    let records = vec![
        trip(Some(1), Some(1), 30),
        trip(Some(2), Some(2), 600),
        trip(Some(3), Some(3), 900),
    ];
    let batch = trip_records_to_batch(&records).unwrap();

    let scored = score_batches(
        &[batch],
        january(),
        &constant_model(1.0),
        &DataPreparer::default(),
    )
    .unwrap();

    assert_eq!(ride_ids(&scored.batches), vec!["2023/01_1", "2023/01_2"]);
}

#[test]
fn test_ride_ids_count_across_batches() {
    let example = example_batch();
    let batches = vec![
        example.slice(0, 3),
        example.slice(3, 1),
        trip_records_to_batch(&[trip(Some(9), Some(9), 300)]).unwrap(),
    ];

    let scored = score_batches(
        &batches,
        Period::new(2022, 11).unwrap(),
        &constant_model(1.0),
        &DataPreparer::default(),
    )
    .unwrap();

    assert_eq!(scored.rows_read, 5);
    // The second batch has nothing left after preparation and is left out
    assert_eq!(scored.batches.len(), 2);
    assert_eq!(
        ride_ids(&scored.batches),
        vec!["2022/11_0", "2022/11_1", "2022/11_4"]
    );
}

#[test]
fn test_one_hot_model_predictions() {
    let scored = score_batches(
        &[example_batch()],
        january(),
        &location_model(),
        &DataPreparer::default(),
    )
    .unwrap();

    // ("-1", "-1") -> 10 + 2, ("1", "1") -> 10 + 1 + 3
    assert_eq!(predictions(&scored.batches), vec![12.0, 14.0]);
    assert_close(scored.summary.sum, 26.0);
    assert_close(scored.summary.mean, 13.0);
    assert_close(scored.summary.std, 1.0);
}

#[test]
fn test_run_batch_local_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_trips(&dir.path().join("input/2023-01.parquet"), &[example_batch()]);
    let config = local_config(dir.path());

    let report = run_batch(&config, january(), &constant_model(12.5)).unwrap();

    let output_path = dir.path().join("output/2023-01.parquet");
    assert_eq!(report.output, Location::Local(output_path.clone()));
    assert_eq!(report.rows_read, 4);
    assert_eq!(report.rows_scored, 2);

    let written = read_parquet(&Location::Local(output_path), &StorageOptions::default()).unwrap();
    let schema = written[0].schema();
    let columns: Vec<(&str, &DataType)> = schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("ride_id", &DataType::Utf8),
            ("predicted_duration", &DataType::Float64)
        ]
    );
    assert_eq!(ride_ids(&written), vec!["2023/01_0", "2023/01_1"]);
    assert_eq!(predictions(&written), vec![12.5, 12.5]);
}

#[test]
fn test_run_batch_with_model_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_trips(&dir.path().join("input/2023-01.parquet"), &[example_batch()]);
    std::fs::write(dir.path().join("model.json"), LOCATION_MODEL_JSON).unwrap();
    let config = local_config(dir.path());

    let model = load_model(&config.model_path).unwrap();
    let report = run_batch(&config, january(), &model).unwrap();

    assert_close(report.summary.mean, 13.0);
    assert_close(report.summary.sum, 26.0);
    assert_close(report.summary.std, 1.0);
}

#[test]
fn test_run_batch_with_nothing_to_score_writes_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let short = trip_records_to_batch(&[trip(Some(1), Some(1), 5)]).unwrap();
    write_trips(&dir.path().join("input/2023-01.parquet"), &[short]);
    let config = local_config(dir.path());

    let report = run_batch(&config, january(), &constant_model(1.0)).unwrap();

    assert_eq!(report.rows_read, 1);
    assert_eq!(report.rows_scored, 0);
    assert!(report.summary.mean.is_nan());
    assert!(dir.path().join("output/2023-01.parquet").exists());
}

#[test]
fn test_run_batch_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    let err = run_batch(&config, january(), &constant_model(1.0)).unwrap_err();

    assert!(matches!(err, RideDurationError::Io(_)));
    assert!(!dir.path().join("output").exists());
}
