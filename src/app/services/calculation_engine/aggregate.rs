//! Score aggregation and display formatting
//!
//! Total scores apply the per-competitor coefficients to the PC/PCG point
//! sum and add CO points on top, truncated toward zero. Totals are always
//! non-negative, so the truncation is safe. A final status override does
//! not suppress the computation: it only removes the bib from ranking
//! contention in downstream reporting.

use super::CalculationEngine;
use crate::app::models::ScoringKind;
use crate::constants::NO_DATA_PLACEHOLDER;

impl CalculationEngine<'_> {
    /// Plain point sum across every section, no coefficients
    pub fn pure_score(&self, bib: u32) -> i64 {
        self.results
            .iter()
            .filter(|((b, _), _)| *b == bib)
            .map(|(_, result)| result.point)
            .sum()
    }

    /// Total score: (PC + PCG points) x coef x age coef + CO points
    ///
    /// Unregistered bibs score zero. Computed even when a final status
    /// override exists for the bib.
    pub fn total_score(&self, bib: u32) -> i64 {
        self.score_over(bib, |_| true)
    }

    /// Total-score formula restricted to a subset of section names
    ///
    /// Sections absent from the bib's result grid are silently skipped.
    /// Used for day-scoped and group-scoped sub-leaderboards.
    pub fn score_for_sections(&self, bib: u32, sections: &[String]) -> i64 {
        self.score_over(bib, |name| sections.iter().any(|s| s == name))
    }

    fn score_over<F>(&self, bib: u32, include: F) -> i64
    where
        F: Fn(&str) -> bool,
    {
        let Some(entry) = self.settings.competitor(bib) else {
            return 0;
        };

        let mut pc_pcg_total: i64 = 0;
        let mut co_total: i64 = 0;

        for ((b, section), result) in &self.results {
            if *b != bib || !include(section) {
                continue;
            }
            match ScoringKind::from_section_name(section) {
                ScoringKind::Pc | ScoringKind::Pcg => pc_pcg_total += result.point,
                ScoringKind::Co => co_total += result.point,
                ScoringKind::Unknown => {}
            }
        }

        (pc_pcg_total as f64 * entry.coefficient * entry.age_coefficient + co_total as f64).trunc()
            as i64
    }
}

/// Format elapsed seconds as `HH:MM:SS.ss`, placeholder for no data
pub fn format_time(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return NO_DATA_PLACEHOLDER.to_string();
    };

    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as i64;
    let secs = seconds % 60.0;
    format!("{:02}:{:02}:{:05.2}", hours, minutes, secs)
}

/// Format a signed differential as `+HH:MM:SS.ss` / `-HH:MM:SS.ss`
pub fn format_diff(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return NO_DATA_PLACEHOLDER.to_string();
    };

    let sign = if seconds >= 0.0 { '+' } else { '-' };
    let magnitude = seconds.abs();
    let hours = (magnitude / 3600.0).floor() as i64;
    let minutes = ((magnitude % 3600.0) / 60.0).floor() as i64;
    let secs = magnitude % 60.0;
    format!("{}{:02}:{:02}:{:05.2}", sign, hours, minutes, secs)
}
