//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use crate::batch::BatchReport;

/// Human-readable outcome of a batch run
#[must_use]
pub fn format_prediction_summary(report: &BatchReport) -> String {
    let summary = &report.summary;
    format!(
        "Scored {} ({} -> {})\n\
         Rows read: {}, rows scored: {}\n\
         predicted mean duration: {:.3}\n\
         predicted sum duration: {:.3}\n\
         Standard deviation of the predicted duration is: {:.3}",
        report.period,
        report.input,
        report.output,
        report.rows_read,
        report.rows_scored,
        summary.mean,
        summary.sum,
        summary.std
    )
}

/// Print the outcome of a batch run to stdout
pub fn print_prediction_summary(report: &BatchReport) {
    println!("{}", format_prediction_summary(report));
}
