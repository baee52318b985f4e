//! Per-section scoring rules
//!
//! PC and PCG sections rank by absolute differential and award points from
//! the rank table; CO sections award a fixed bonus inside a one-minute
//! clear window. Status overrides short-circuit scoring: RIT and BLNK
//! suppress timing entirely, N.C. keeps the measured time and diff but
//! leaves the bib out of the ranking pool.

use tracing::warn;

use super::CalculationEngine;
use crate::app::models::SectionResult;
use crate::app::services::timing_parser::TimingParser;
use crate::constants::CO_CLEAR_WINDOW_SECONDS;

impl CalculationEngine<'_> {
    /// Score a PC section: rank by |diff| ascending, points from the table
    pub(crate) fn score_pc(&mut self, section: &str) {
        let Some(target) = self.settings.target_time(section) else {
            return;
        };
        self.score_ranked(section, target, |timing, bib| {
            timing.passage_time(bib, section)
        });
    }

    /// Score a CO section: fixed bonus iff 0 <= diff < 60, never ranked
    pub(crate) fn score_co(&mut self, section: &str) {
        let Some(target) = self.settings.target_time(section) else {
            return;
        };

        for idx in 0..self.bib_universe.len() {
            let bib = self.bib_universe[idx];
            let mut result = SectionResult::default();

            match self.status_for(bib, section) {
                Some(status) if status.bypasses_timing() => {
                    result.status = Some(status);
                }
                status => {
                    result.status = status;
                    if let Some(passage) = self.timing.passage_time(bib, section) {
                        let diff = passage - target as f64;
                        result.passage_time = Some(passage);
                        result.diff = Some(diff);
                        if (0.0..CO_CLEAR_WINDOW_SECONDS).contains(&diff) {
                            result.point = self.co_point;
                        }
                    }
                }
            }

            self.results.insert((bib, section.to_string()), result);
        }
    }

    /// Score a PCG section: grouped elapsed time over the group's PC chain
    ///
    /// The group's first PC section anchors the START and its last PC
    /// section the GOAL. Groups with fewer than two PC sections cannot
    /// produce a grouped time and the section is skipped entirely.
    pub(crate) fn score_pcg(&mut self, section: &str) {
        let Some(target) = self.settings.target_time(section) else {
            return;
        };
        let Some(group) = self.settings.section(section).map(|s| s.group) else {
            return;
        };

        let pc_sections = self.settings.pc_sections_in_group(group);
        if pc_sections.len() < 2 {
            warn!(
                "PCG section '{}' skipped: group {} has {} PC sections",
                section,
                group,
                pc_sections.len()
            );
            return;
        }

        let start_section = pc_sections[0].clone();
        let goal_section = pc_sections[pc_sections.len() - 1].clone();

        self.score_ranked(section, target, |timing, bib| {
            timing.linked_passage_time(bib, &start_section, &goal_section)
        });
    }

    /// Shared PC/PCG pass: fill result cells, then rank and award points
    ///
    /// Bibs enter the ranking pool in ascending bib order; the stable sort
    /// by |diff| therefore breaks ties by bib number.
    fn score_ranked<F>(&mut self, section: &str, target: i64, passage_of: F)
    where
        F: Fn(&TimingParser, u32) -> Option<f64>,
    {
        // (bib, |diff|) pool of rankable entries
        let mut pool: Vec<(u32, f64)> = Vec::new();

        for idx in 0..self.bib_universe.len() {
            let bib = self.bib_universe[idx];
            let mut result = SectionResult::default();

            match self.status_for(bib, section) {
                Some(status) if status.bypasses_timing() => {
                    result.status = Some(status);
                }
                status => {
                    if let Some(passage) = passage_of(self.timing, bib) {
                        let diff = passage - target as f64;
                        result.passage_time = Some(passage);
                        result.diff = Some(diff);
                        // N.C. keeps the measured time but never ranks
                        if status.is_none() {
                            pool.push((bib, diff.abs()));
                        }
                    }
                    result.status = status;
                }
            }

            self.results.insert((bib, section.to_string()), result);
        }

        pool.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (position, (bib, _)) in pool.iter().enumerate() {
            let rank = (position + 1) as u32;
            if let Some(result) = self.results.get_mut(&(*bib, section.to_string())) {
                result.rank = Some(rank);
                result.point = self.settings.points_for_rank(rank);
            }
        }
    }
}
