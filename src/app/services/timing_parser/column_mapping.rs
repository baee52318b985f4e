//! Column inference for timing files
//!
//! Timing files have no fixed schema; the relevant columns are located by
//! header content. The column whose header contains "time" (any case) is
//! the timestamp column, the column immediately to its right holds the bib
//! number, and the column immediately to its left, when present, is the
//! lane/type column.

use crate::{Error, Result};
use csv::StringRecord;

/// Resolved column indexes for one timing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeColumns {
    /// Timestamp column
    pub time: usize,

    /// Lane/type column, absent when the time column is leftmost
    pub lane: Option<usize>,

    /// Bib number column, always immediately right of the time column
    pub bib: usize,
}

impl TimeColumns {
    /// Infer the time / lane / bib columns from a header row
    ///
    /// # Errors
    /// * `Error::TimingParse` when no header contains "time", or the time
    ///   column is the last column (no room for the bib column)
    pub fn infer(headers: &StringRecord, file: &str) -> Result<Self> {
        let time = headers
            .iter()
            .position(|header| header.to_lowercase().contains("time"))
            .ok_or_else(|| Error::timing_parse(file, "no time column found"))?;

        if time + 1 >= headers.len() {
            return Err(Error::timing_parse(
                file,
                "no number column found (nothing to the right of the time column)",
            ));
        }

        Ok(TimeColumns {
            time,
            lane: time.checked_sub(1),
            bib: time + 1,
        })
    }
}
