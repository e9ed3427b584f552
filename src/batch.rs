//! One month's batch run: read trips, prepare, score, write predictions.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field};
use arrow::record_batch::RecordBatch;

use crate::config::{BatchConfig, Period};
use crate::error::Result;
use crate::model::{Model, feature_rows};
use crate::prepare::DataPreparer;
use crate::schema::{self, RIDE_ID_COLUMN, output_schema};
use crate::storage::{Location, read_parquet, write_parquet};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Aggregate statistics over the predicted durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionSummary {
    pub count: usize,
    pub mean: f64,
    pub sum: f64,
    /// Population standard deviation
    pub std: f64,
}

impl PredictionSummary {
    /// Summarize predictions; mean and std are NaN when there are none
    #[must_use]
    pub fn from_predictions(predictions: &[f64]) -> Self {
        let count = predictions.len();
        let sum: f64 = predictions.iter().sum();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                sum,
                std: f64::NAN,
            };
        }

        let mean = sum / count as f64;
        let variance = predictions.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            mean,
            sum,
            std: variance.sqrt(),
        }
    }
}

/// Outcome of [`run_batch`]
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub period: Period,
    pub input: Location,
    pub output: Location,
    pub rows_read: usize,
    pub rows_scored: usize,
    pub summary: PredictionSummary,
}

/// Prediction tables produced by [`score_batches`]
#[derive(Debug, Clone)]
pub struct ScoredBatches {
    /// Batches in the output schema, empty batches left out
    pub batches: Vec<RecordBatch>,
    pub rows_read: usize,
    pub summary: PredictionSummary,
}

/// Attach the `ride_id` column, numbering rows from `offset`
pub fn attach_ride_ids(batch: &RecordBatch, period: Period, offset: usize) -> Result<RecordBatch> {
    let ids: StringArray = (offset..offset + batch.num_rows())
        .map(|row_index| Some(period.ride_id(row_index)))
        .collect();

    schema::upsert_column(
        batch,
        Field::new(RIDE_ID_COLUMN, DataType::Utf8, false),
        Arc::new(ids) as ArrayRef,
    )
}

/// Score raw trip batches without touching storage
///
/// Ride ids are assigned before preparation so they keep the row's position
/// in the source table across batch boundaries.
pub fn score_batches(
    batches: &[RecordBatch],
    period: Period,
    model: &Model,
    preparer: &DataPreparer,
) -> Result<ScoredBatches> {
    let mut offset = 0;
    let mut scored = Vec::with_capacity(batches.len());
    let mut predictions = Vec::new();

    for batch in batches {
        let with_ids = attach_ride_ids(batch, period, offset)?;
        offset += batch.num_rows();

        let prepared = preparer.prepare(&with_ids)?;
        if prepared.num_rows() == 0 {
            continue;
        }

        let rows = feature_rows(&prepared, preparer.categorical())?;
        let batch_predictions = model.predict_rows(&rows)?;

        scored.push(RecordBatch::try_new(
            output_schema(),
            vec![
                Arc::clone(schema::column(&prepared, RIDE_ID_COLUMN)?),
                Arc::new(Float64Array::from(batch_predictions.clone())) as ArrayRef,
            ],
        )?);
        predictions.extend(batch_predictions);
    }

    Ok(ScoredBatches {
        batches: scored,
        rows_read: offset,
        summary: PredictionSummary::from_predictions(&predictions),
    })
}

/// Score one month end to end
pub fn run_batch(config: &BatchConfig, period: Period, model: &Model) -> Result<BatchReport> {
    let start = Instant::now();
    let input = Location::parse(&config.input_location(period)?)?;
    let output = Location::parse(&config.output_location(period)?)?;
    log_operation_start("Scoring trips for", period);

    let batches = read_parquet(&input, &config.storage)?;
    let scored = score_batches(&batches, period, model, &DataPreparer::default())?;
    if scored.summary.count == 0 {
        log_warning("No trips left to score", Some(&input));
    }

    let summary = scored.summary;
    log::debug!(
        "Predicted duration mean {:.3}, sum {:.3}, std {:.3}",
        summary.mean,
        summary.sum,
        summary.std
    );

    write_parquet(&output, output_schema(), &scored.batches, &config.storage)?;
    log_operation_complete("scored", period, summary.count, Some(start.elapsed()));

    Ok(BatchReport {
        period,
        input,
        output,
        rows_read: scored.rows_read,
        rows_scored: summary.count,
        summary,
    })
}
