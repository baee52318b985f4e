//! Settings store for the roster, points and section reference tables
//!
//! This module loads the three settings tables from a settings folder and
//! pre-indexes sections by name, group and day so that scoring-time queries
//! are plain map lookups instead of repeated table scans.

use crate::app::models::{Competitor, ScoringKind, Section};
use std::collections::HashMap;
use std::path::PathBuf;

pub mod loader;

/// Reference tables for one event, loaded once per run
///
/// The store owns the competitor roster (with per-competitor coefficients),
/// the rank-to-points table, and the ordered section definitions. Section
/// order is preserved exactly as loaded.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    /// Folder the tables were loaded from
    pub(crate) settings_dir: PathBuf,

    /// Roster indexed by bib number
    pub(crate) competitors: HashMap<u32, Competitor>,

    /// Rank -> points lookup
    pub(crate) points: HashMap<u32, i64>,

    /// Sections in load order
    pub(crate) sections: Vec<Section>,

    /// Section name -> index into `sections`
    pub(crate) by_name: HashMap<String, usize>,

    /// Group number -> section names in load order
    pub(crate) by_group: HashMap<u32, Vec<String>>,

    /// Group number -> PC section names in load order (PCG excluded)
    pub(crate) pc_by_group: HashMap<u32, Vec<String>>,

    /// Day number -> section names in load order (empty without a DAY column)
    pub(crate) by_day: HashMap<u32, Vec<String>>,
}

impl SettingsStore {
    /// Folder the tables were loaded from
    pub fn settings_dir(&self) -> &std::path::Path {
        &self.settings_dir
    }

    /// Get a roster entry by bib number
    pub fn competitor(&self, bib: u32) -> Option<&Competitor> {
        self.competitors.get(&bib)
    }

    /// All roster bib numbers, ascending
    pub fn bibs(&self) -> Vec<u32> {
        let mut bibs: Vec<u32> = self.competitors.keys().copied().collect();
        bibs.sort_unstable();
        bibs
    }

    pub fn competitor_count(&self) -> usize {
        self.competitors.len()
    }

    /// Points for a rank; ranks beyond the table earn zero
    pub fn points_for_rank(&self, rank: u32) -> i64 {
        self.points.get(&rank).copied().unwrap_or(0)
    }

    /// Get a section definition by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.by_name.get(name).map(|&idx| &self.sections[idx])
    }

    /// Target time in seconds for a section
    pub fn target_time(&self, name: &str) -> Option<i64> {
        self.section(name).map(|s| s.target_time)
    }

    /// All sections in load order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in load order
    pub fn section_order(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Section names sharing a group number, in load order
    pub fn sections_in_group(&self, group: u32) -> &[String] {
        self.by_group.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// PC section names of a group in load order, excluding PCG sections
    pub fn pc_sections_in_group(&self, group: u32) -> &[String] {
        self.pc_by_group
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Section names assigned to a day, in load order
    pub fn sections_for_day(&self, day: u32) -> &[String] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest day number in the section table, zero without a DAY column
    pub fn max_day(&self) -> u32 {
        self.by_day.keys().copied().max().unwrap_or(0)
    }

    /// Rebuild the derived indexes from the section list
    pub(crate) fn build_indexes(&mut self) {
        self.by_name.clear();
        self.by_group.clear();
        self.pc_by_group.clear();
        self.by_day.clear();

        for (idx, section) in self.sections.iter().enumerate() {
            self.by_name.insert(section.name.clone(), idx);
            self.by_group
                .entry(section.group)
                .or_default()
                .push(section.name.clone());
            if section.effective_kind() == ScoringKind::Pc {
                self.pc_by_group
                    .entry(section.group)
                    .or_default()
                    .push(section.name.clone());
            }
            if let Some(day) = section.day {
                self.by_day.entry(day).or_default().push(section.name.clone());
            }
        }
    }
}
