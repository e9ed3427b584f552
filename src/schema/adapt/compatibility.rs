//! Module for handling data type compatibility checks.

use arrow::datatypes::{DataType, Schema, TimeUnit};

use crate::error::{RideDurationError, Result};
use crate::schema::{DROPOFF_TIME_COLUMN, PICKUP_TIME_COLUMN};

/// Types of data type compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCompatibility {
    /// Types match exactly
    Exact,
    /// Types can be automatically converted
    Compatible,
    /// Types are incompatible
    Incompatible,
}

/// What the preparer does with a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Integer-like label rendered as a string
    Categorical,
    /// Point in time used for the duration
    Timestamp,
}

/// Check whether a column of `data_type` can serve in `role`
#[must_use]
pub fn check_type_compatibility(role: ColumnRole, data_type: &DataType) -> TypeCompatibility {
    match (role, data_type) {
        (ColumnRole::Categorical, DataType::Int64) => TypeCompatibility::Exact,
        (ColumnRole::Categorical, DataType::Null) => TypeCompatibility::Compatible,
        (ColumnRole::Categorical, t) if is_numeric(t) || is_string(t) => {
            TypeCompatibility::Compatible
        }
        (ColumnRole::Timestamp, DataType::Timestamp(TimeUnit::Microsecond, _)) => {
            TypeCompatibility::Exact
        }
        (ColumnRole::Timestamp, DataType::Timestamp(_, _)) => TypeCompatibility::Compatible,
        _ => TypeCompatibility::Incompatible,
    }
}

/// Identifies whether a data type is numeric
#[must_use]
pub const fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Identifies whether a data type is a string type
#[must_use]
pub const fn is_string(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Utf8 | DataType::LargeUtf8)
}

/// Check that a trip table carries both timestamps and every categorical column
/// in a usable type. All problems are reported together.
pub fn validate_trip_schema(schema: &Schema, categorical: &[String]) -> Result<()> {
    let timestamp_columns = [PICKUP_TIME_COLUMN, DROPOFF_TIME_COLUMN]
        .into_iter()
        .map(|name| (name, ColumnRole::Timestamp));
    let categorical_columns = categorical
        .iter()
        .map(|name| (name.as_str(), ColumnRole::Categorical));

    let issues: Vec<String> = timestamp_columns
        .chain(categorical_columns)
        .filter_map(|(name, role)| match schema.field_with_name(name) {
            Err(_) => Some(format!("missing column {name}")),
            Ok(field) => match check_type_compatibility(role, field.data_type()) {
                TypeCompatibility::Incompatible => Some(format!(
                    "column {name} has type {} which cannot be used as {role:?}",
                    field.data_type()
                )),
                TypeCompatibility::Exact | TypeCompatibility::Compatible => None,
            },
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(RideDurationError::schema(issues.join("; ")))
    }
}
