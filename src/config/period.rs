//! The month a batch run scores.

use std::fmt;
use std::str::FromStr;

use crate::error::{RideDurationError, Result};

/// A calendar month, the unit of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12 and years outside 1..=9999
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(RideDurationError::config(format!("Invalid month: {month}")));
        }
        if !(1..=9999).contains(&year) {
            return Err(RideDurationError::config(format!("Invalid year: {year}")));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Ride identifier for the row at `row_index` of this month's source table
    #[must_use]
    pub fn ride_id(&self, row_index: usize) -> String {
        format!("{:04}/{:02}_{row_index}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = RideDurationError;

    /// Parse `YYYY-MM` or `YYYYMM`
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = match s.split_once('-') {
            Some(parts) => parts,
            None if s.len() == 6 && s.is_ascii() => s.split_at(4),
            None => {
                return Err(RideDurationError::config(format!(
                    "Invalid period format: {s}"
                )));
            }
        };

        let year = year
            .parse::<i32>()
            .map_err(|e| RideDurationError::config(format!("Invalid year in {s}: {e}")))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| RideDurationError::config(format!("Invalid month in {s}: {e}")))?;

        Self::new(year, month)
    }
}
