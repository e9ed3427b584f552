//! Logging utilities for output
//!
//! This module provides utilities for logging and console output.

pub mod console;
pub mod log;

// Re-export commonly used functions for convenience
pub use console::{format_prediction_summary, print_prediction_summary};
pub use log::{log_operation_complete, log_operation_start, log_warning};
