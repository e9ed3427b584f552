//! Batch scoring of taxi trip records.
//!
//! Reads a month of trip data from Parquet, derives trip durations, keeps the
//! trips worth scoring, runs a pre-fit encoder and predictor over them, and
//! writes one predicted duration per ride back out as Parquet.

pub mod batch;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod prepare;
pub mod records;
pub mod schema;
pub mod storage;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use batch::{BatchReport, PredictionSummary, ScoredBatches, run_batch, score_batches};
pub use config::{BatchConfig, PathTemplate, Period};
pub use error::{Result, RideDurationError};
pub use prepare::DataPreparer;
pub use records::{PreparedRecord, TripRecord};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Model
pub use model::{FeatureEncoder, FeatureMatrix, FeatureRow, FeatureValue, Model, Predictor, load_model};

// Storage
pub use storage::{Location, StorageOptions, read_parquet, write_parquet};
