//! Extraction of encoder input from a prepared trip table.

use arrow::array::{Array, AsArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;

use crate::error::{RideDurationError, Result};
use crate::model::{FeatureRow, FeatureValue};
use crate::schema::{self, is_numeric};

/// One feature row per table row, keyed by column name
///
/// String columns become labels and numeric columns become numbers. A null
/// leaves the field out of the row, which the encoder treats as absent.
pub fn feature_rows(batch: &RecordBatch, columns: &[String]) -> Result<Vec<FeatureRow>> {
    let mut rows = vec![FeatureRow::new(); batch.num_rows()];

    for name in columns {
        let column = schema::column(batch, name)?;

        match column.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => {
                let labels = cast::cast(column, &DataType::Utf8)?;
                for (row, label) in rows.iter_mut().zip(labels.as_string::<i32>().iter()) {
                    if let Some(label) = label {
                        row.insert(name.clone(), FeatureValue::Str(label.to_string()));
                    }
                }
            }
            t if is_numeric(t) => {
                let values = cast::cast(column, &DataType::Float64)?;
                for (row, value) in rows.iter_mut().zip(values.as_primitive::<Float64Type>().iter()) {
                    if let Some(value) = value {
                        row.insert(name.clone(), FeatureValue::Num(value));
                    }
                }
            }
            other => {
                return Err(RideDurationError::schema(format!(
                    "Column {name} has type {other}, which cannot be used as a feature"
                )));
            }
        }
    }

    Ok(rows)
}
