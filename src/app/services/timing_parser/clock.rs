//! Time-of-day parsing and elapsed-time derivation
//!
//! Timestamp strings are wall-clock times of day with optional fractional
//! seconds. Elapsed times spanning midnight come out negative and are
//! shifted by one day: a start just before midnight and a goal just after
//! must yield a small positive passage time.

use crate::constants::{SECONDS_PER_DAY, TIME_OF_DAY_FORMATS};
use chrono::NaiveTime;

/// Parse a wall-clock timestamp under the accepted formats
///
/// Returns `None` for anything unparsable; a bad timestamp is soft no-data,
/// not a structural parse error.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
}

/// Elapsed seconds from a START to a GOAL timestamp string
///
/// Returns `None` when either endpoint fails to parse. A negative raw
/// difference means the goal fell past midnight and gains one day.
pub fn elapsed_seconds(start: &str, goal: &str) -> Option<f64> {
    let start_time = parse_time_of_day(start)?;
    let goal_time = parse_time_of_day(goal)?;

    let micros = (goal_time - start_time).num_microseconds()?;
    let mut seconds = micros as f64 / 1_000_000.0;
    if seconds < 0.0 {
        seconds += SECONDS_PER_DAY;
    }
    Some(seconds)
}
