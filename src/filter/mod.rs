//! Filtering capabilities for trip tables
//!
//! Filters work on whole Arrow record batches through a boolean mask and
//! preserve the order of the rows they keep.

pub mod core;
pub mod duration;

pub use self::core::{BatchFilter, filter_record_batch};
pub use self::duration::{DurationWindowFilter, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
