//! Core timing parser implementation
//!
//! This module provides the parsing orchestration: race folder scanning,
//! per-file column inference and row extraction, and the passage-time
//! queries consumed by the calculation engine.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::clock;
use super::column_mapping::TimeColumns;
use super::filename::infer_section_events;
use crate::app::models::{Leg, RawTimingRecord};
use crate::constants::TIMING_FILE_PATTERN;
use crate::{Error, Result};

/// Timing parser for a race folder of checkpoint timestamp files
///
/// The parser records verbatim time strings at parse time; time-format
/// validation happens lazily in the passage-time queries, where a bad
/// timestamp is soft no-data rather than a structural error.
#[derive(Debug, Clone, Default)]
pub struct TimingParser {
    race_dir: PathBuf,

    /// (bib, section) -> verbatim START time string
    start_times: HashMap<(u32, String), String>,

    /// (bib, section) -> verbatim GOAL time string
    goal_times: HashMap<(u32, String), String>,

    /// All observations in global parse order
    records: Vec<RawTimingRecord>,
}

/// Outcome summary of a successful parse batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSummary {
    /// Files that carried timing data
    pub files_parsed: usize,

    /// Files whose name encoded no section endpoint
    pub files_skipped: usize,

    /// Distinct bibs observed across all files
    pub bib_count: usize,
}

impl TimingParser {
    /// Create a parser over a race folder
    pub fn new(race_dir: impl Into<PathBuf>) -> Self {
        Self {
            race_dir: race_dir.into(),
            ..Self::default()
        }
    }

    pub fn race_dir(&self) -> &Path {
        &self.race_dir
    }

    /// Parse every timing file in the race folder
    ///
    /// Files are processed in sorted filename order so that record sequence
    /// numbers are deterministic across runs. Any single file error aborts
    /// the whole batch with the offending file named in the message; no
    /// partial state survives a failed batch.
    pub fn parse_all(&mut self) -> Result<ParseSummary> {
        self.start_times.clear();
        self.goal_times.clear();
        self.records.clear();

        let search = self.race_dir.join(TIMING_FILE_PATTERN);
        let mut files: Vec<PathBuf> = glob::glob(&search.to_string_lossy())
            .map_err(|e| {
                Error::timing_parse(
                    self.race_dir.display().to_string(),
                    format!("invalid race folder pattern: {}", e),
                )
            })?
            .filter_map(|entry| entry.ok())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(Error::timing_parse(
                self.race_dir.display().to_string(),
                "no CSV files found in race folder",
            ));
        }

        let mut summary = ParseSummary {
            files_parsed: 0,
            files_skipped: 0,
            bib_count: 0,
        };

        for file in &files {
            match self.parse_file(file) {
                Ok(true) => summary.files_parsed += 1,
                Ok(false) => summary.files_skipped += 1,
                Err(e) => {
                    // All-or-nothing per batch: drop partial state
                    self.start_times.clear();
                    self.goal_times.clear();
                    self.records.clear();
                    return Err(e);
                }
            }
        }

        summary.bib_count = self.bibs().len();
        info!(
            "Parsed {} timing files ({} skipped), {} bibs observed",
            summary.files_parsed, summary.files_skipped, summary.bib_count
        );
        Ok(summary)
    }

    /// Parse one timing file; returns false when the file carries no
    /// section endpoint in its name and was skipped
    fn parse_file(&mut self, path: &Path) -> Result<bool> {
        let file = file_label(path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let events = infer_section_events(&stem);
        if events.is_empty() {
            debug!("Skipping '{}': no section endpoint in file name", file);
            return Ok(false);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", file), e))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing(file.as_str(), "Failed to read headers", Some(e)))?
            .clone();
        let columns = TimeColumns::infer(&headers, &file)?;

        let mut seen_bibs: HashSet<u32> = HashSet::new();

        for record in reader.records() {
            let record = record
                .map_err(|e| Error::csv_parsing(file.as_str(), "Failed to read record", Some(e)))?;

            let bib_cell = record.get(columns.bib).map(str::trim).unwrap_or("");
            if bib_cell.is_empty() {
                continue;
            }
            // Tolerate "7.0"-style renderings of the bib number
            let Some(bib) = bib_cell.parse::<f64>().ok().filter(|v| *v >= 0.0) else {
                continue;
            };
            let bib = bib as u32;

            if seen_bibs.contains(&bib) {
                return Err(Error::timing_parse(
                    file,
                    format!("bib {} appears more than once", bib),
                ));
            }

            let time = record.get(columns.time).map(str::trim).unwrap_or("");
            if time.is_empty() {
                continue;
            }
            seen_bibs.insert(bib);

            let lane = columns
                .lane
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            for (section, leg) in &events {
                let map = match leg {
                    Leg::Start => &mut self.start_times,
                    Leg::Goal => &mut self.goal_times,
                };
                map.insert((bib, section.clone()), time.to_string());

                self.records.push(RawTimingRecord {
                    seq: self.records.len(),
                    file: file.clone(),
                    section: section.clone(),
                    leg: *leg,
                    bib,
                    time: time.to_string(),
                    lane: lane.clone(),
                });
            }
        }

        debug!(
            "Parsed '{}': {} endpoints, {} bibs",
            file,
            events.len(),
            seen_bibs.len()
        );
        Ok(true)
    }

    /// Elapsed seconds between a bib's START and GOAL for one section
    ///
    /// `None` when either endpoint is missing or unparsable; this is soft
    /// no-data, distinct from structural parse errors.
    pub fn passage_time(&self, bib: u32, section: &str) -> Option<f64> {
        let start = self.start_times.get(&(bib, section.to_string()))?;
        let goal = self.goal_times.get(&(bib, section.to_string()))?;
        clock::elapsed_seconds(start, goal)
    }

    /// Elapsed seconds from one section's START to another section's GOAL
    ///
    /// Used for grouped (PCG) measurements spanning several PC checkpoints:
    /// the START anchor is the group's first PC section and the GOAL anchor
    /// its last.
    pub fn linked_passage_time(
        &self,
        bib: u32,
        start_section: &str,
        goal_section: &str,
    ) -> Option<f64> {
        let start = self.start_times.get(&(bib, start_section.to_string()))?;
        let goal = self.goal_times.get(&(bib, goal_section.to_string()))?;
        clock::elapsed_seconds(start, goal)
    }

    pub fn has_start(&self, bib: u32, section: &str) -> bool {
        self.start_times.contains_key(&(bib, section.to_string()))
    }

    pub fn has_goal(&self, bib: u32, section: &str) -> bool {
        self.goal_times.contains_key(&(bib, section.to_string()))
    }

    /// All bibs observed in either map, ascending
    pub fn bibs(&self) -> Vec<u32> {
        let mut bibs: BTreeSet<u32> = BTreeSet::new();
        bibs.extend(self.start_times.keys().map(|(bib, _)| *bib));
        bibs.extend(self.goal_times.keys().map(|(bib, _)| *bib));
        bibs.into_iter().collect()
    }

    /// All raw observations in global parse order
    pub fn records(&self) -> &[RawTimingRecord] {
        &self.records
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
