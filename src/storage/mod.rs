//! Table storage
//!
//! Locations are parsed from rendered path templates and resolved against
//! [`StorageOptions`] before any bytes move.

mod location;
pub mod parquet;

pub use location::{Location, Resolved, StorageOptions};
pub use parquet::{DEFAULT_BATCH_SIZE, get_batch_size, read_parquet, write_parquet};
