//! Adaptation of trip columns to the types the preparer works with.
//!
//! Trip files in the wild store location ids as any integer width, or as
//! floats when a writer promoted a nullable integer column, and timestamps in
//! any unit with or without a zone. Everything is normalised here before the
//! preparer touches it.

pub mod compatibility;
pub mod conversions;

pub use compatibility::{
    ColumnRole, TypeCompatibility, check_type_compatibility, is_numeric, is_string,
    validate_trip_schema,
};
pub use conversions::{
    categorical_strings, finer_unit, location_ids, ticks_per_second, timestamp_micros,
    timestamp_ticks, timestamp_unit,
};
