//! Module for converting trip columns between array types.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Int64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Int64Type, TimeUnit};

use crate::error::{RideDurationError, Result};
use crate::prepare::categorical_label;
use crate::schema::MISSING_CATEGORY;
use crate::schema::adapt::compatibility::{is_numeric, is_string};

/// Unit of a timestamp column
pub fn timestamp_unit(array: &ArrayRef, column: &str) -> Result<TimeUnit> {
    match array.data_type() {
        DataType::Timestamp(unit, _) => Ok(*unit),
        _ => Err(not_a_timestamp(array, column)),
    }
}

fn not_a_timestamp(array: &ArrayRef, column: &str) -> RideDurationError {
    RideDurationError::schema(format!(
        "Column {column} has type {}, expected a timestamp",
        array.data_type()
    ))
}

/// Ticks of `unit` in one second
#[must_use]
pub const fn ticks_per_second(unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    }
}

/// The finer of two units, so neither column loses precision when cast to it
#[must_use]
pub const fn finer_unit(a: TimeUnit, b: TimeUnit) -> TimeUnit {
    if ticks_per_second(a) >= ticks_per_second(b) { a } else { b }
}

/// Convert a timestamp column of any unit and zone into ticks of `unit` since the epoch
///
/// The zone is kept through the unit conversion, so differences between two
/// columns are the same whatever zone they were stored in.
pub fn timestamp_ticks(array: &ArrayRef, column: &str, unit: TimeUnit) -> Result<Int64Array> {
    let ticks = match array.data_type() {
        DataType::Timestamp(current, _) if *current == unit => Arc::clone(array),
        DataType::Timestamp(_, tz) => {
            cast::cast(array, &DataType::Timestamp(unit, tz.clone()))?
        }
        _ => return Err(not_a_timestamp(array, column)),
    };

    let values = cast::cast(&ticks, &DataType::Int64)?;
    Ok(values.as_primitive::<Int64Type>().clone())
}

/// Convert a timestamp column of any unit and zone into microseconds since the epoch
pub fn timestamp_micros(array: &ArrayRef, column: &str) -> Result<Int64Array> {
    timestamp_ticks(array, column, TimeUnit::Microsecond)
}

/// Convert a numeric location column into nullable 64-bit integers
///
/// Floats are truncated toward zero. NaN and values that do not fit become null.
pub fn location_ids(array: &ArrayRef, column: &str) -> Result<Int64Array> {
    let data_type = array.data_type();
    if !(is_numeric(data_type) || data_type == &DataType::Null) {
        return Err(RideDurationError::schema(format!(
            "Column {column} has type {data_type}, expected an integer-like column"
        )));
    }

    let values = cast::cast(array, &DataType::Int64)?;
    Ok(values.as_primitive::<Int64Type>().clone())
}

/// Render a categorical column as strings, with missing values as the sentinel
///
/// String columns are taken as already rendered and only have their nulls filled.
pub fn categorical_strings(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    let data_type = array.data_type();

    if is_string(data_type) {
        let utf8 = cast::cast(array, &DataType::Utf8)?;
        let missing = MISSING_CATEGORY.to_string();
        let rendered: StringArray = utf8
            .as_string::<i32>()
            .iter()
            .map(|value| Some(value.unwrap_or(missing.as_str())))
            .collect();
        return Ok(Arc::new(rendered));
    }

    let ids = location_ids(array, column)?;
    let rendered: StringArray = ids
        .iter()
        .map(|value| Some(categorical_label(value)))
        .collect();
    debug_assert_eq!(rendered.null_count(), 0);

    Ok(Arc::new(rendered))
}
