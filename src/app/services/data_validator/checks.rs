//! The individual integrity checks
//!
//! Each check is a pure function over supplied data returning zero or more
//! findings. Iteration everywhere uses ordered collections so that finding
//! order is deterministic across runs.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use super::{Finding, FindingDetails, FindingKind};
use crate::app::models::{Leg, RawTimingRecord, ScoringKind, Section, SectionStatusMap};
use crate::app::services::calculation_engine::CalculationEngine;
use crate::app::services::timing_parser::filename::filename_tokens;
use crate::constants::{
    MANUAL_LANE_MARKER, MEASUREMENT_DEFICIENCY_RATIO, PC_DEVIATION_THRESHOLD_SECONDS,
    TIMING_FILE_PATTERN,
};

/// Check 1: section tokens claimed by more than one timing file
///
/// `PC3GOAL.csv` next to `PC3GOAL_PC4START.csv` makes the PC3 goal
/// assignment ambiguous; this is a hard error.
pub(crate) fn check_duplicate_filenames(race_dir: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();

    let search = race_dir.join(TIMING_FILE_PATTERN);
    let Ok(paths) = glob::glob(&search.to_string_lossy()) else {
        return findings;
    };
    let mut files: Vec<String> = paths
        .filter_map(|entry| entry.ok())
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    files.sort();

    let mut token_files: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in &files {
        let stem = file.strip_suffix(".csv").unwrap_or(file);
        for token in filename_tokens(stem) {
            token_files.entry(token).or_default().push(file.clone());
        }
    }

    for (token, files) in token_files {
        if files.len() > 1 {
            findings.push(Finding::new(
                FindingKind::DuplicateSourceFile,
                format!(
                    "Section token '{}' is claimed by {} files: {}",
                    token,
                    files.len(),
                    files.join(", ")
                ),
                FindingDetails::DuplicateSourceFile { token, files },
            ));
        }
    }

    findings
}

/// Check 2: a bib occurring more than once in one section endpoint
pub(crate) fn check_duplicate_bibs(records: &[RawTimingRecord]) -> Vec<Finding> {
    let mut counts: BTreeMap<(String, u32), (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = counts
            .entry((record.section.clone(), record.bib))
            .or_default();
        match record.leg {
            Leg::Start => entry.0 += 1,
            Leg::Goal => entry.1 += 1,
        }
    }

    let mut findings = Vec::new();
    for ((section, bib), (start_count, goal_count)) in counts {
        if start_count > 1 || goal_count > 1 {
            findings.push(Finding::new(
                FindingKind::DuplicateBib,
                format!(
                    "Bib {} appears more than once in section '{}' ({} START, {} GOAL records)",
                    bib, section, start_count, goal_count
                ),
                FindingDetails::DuplicateBib {
                    section,
                    bib,
                    start_count,
                    goal_count,
                },
            ));
        }
    }

    findings
}

/// Observed bib arrival order for one section: first occurrence wins,
/// records under a status override are excluded
fn arrival_order(
    records: &[RawTimingRecord],
    section: &str,
    statuses: &SectionStatusMap,
) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for record in records {
        if record.section != section {
            continue;
        }
        if statuses.contains_key(&(record.bib, record.section.clone())) {
            continue;
        }
        if seen.insert(record.bib) {
            order.push(record.bib);
        }
    }
    order
}

/// Sections of each group in definition order; group 0 means ungrouped
fn grouped_sections(sections: &[Section]) -> BTreeMap<u32, Vec<&Section>> {
    let mut groups: BTreeMap<u32, Vec<&Section>> = BTreeMap::new();
    for section in sections {
        if section.group != 0 {
            groups.entry(section.group).or_default().push(section);
        }
    }
    groups
}

/// Check 3: sections of one group must see bibs in the same order
///
/// The group's first section provides the baseline order; every other
/// section with at least two bibs in common is compared on the common
/// subsequence. Order mismatches, missing bibs and extra bibs are merged
/// into one finding per group.
pub(crate) fn check_section_passage_order(
    records: &[RawTimingRecord],
    sections: &[Section],
    statuses: &SectionStatusMap,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (group, group_sections) in grouped_sections(sections) {
        if group_sections.len() < 2 {
            continue;
        }

        let baseline = &group_sections[0].name;
        let base_order = arrival_order(records, baseline, statuses);
        if base_order.is_empty() {
            continue;
        }
        let base_set: HashSet<u32> = base_order.iter().copied().collect();

        let mut mismatched_sections = Vec::new();
        let mut missing_bibs = Vec::new();
        let mut extra_bibs = Vec::new();

        for section in &group_sections[1..] {
            let current_order = arrival_order(records, &section.name, statuses);
            if current_order.is_empty() {
                continue;
            }
            let current_set: HashSet<u32> = current_order.iter().copied().collect();

            let common: HashSet<u32> = base_set.intersection(&current_set).copied().collect();
            if common.len() < 2 {
                continue;
            }

            let base_common: Vec<u32> = base_order
                .iter()
                .filter(|bib| common.contains(bib))
                .copied()
                .collect();
            let current_common: Vec<u32> = current_order
                .iter()
                .filter(|bib| common.contains(bib))
                .copied()
                .collect();
            if base_common != current_common {
                mismatched_sections.push(section.name.clone());
            }

            let mut missing: Vec<u32> = base_set.difference(&current_set).copied().collect();
            missing.sort_unstable();
            if !missing.is_empty() {
                missing_bibs.push((section.name.clone(), missing));
            }

            let mut extra: Vec<u32> = current_set.difference(&base_set).copied().collect();
            extra.sort_unstable();
            if !extra.is_empty() {
                extra_bibs.push((section.name.clone(), extra));
            }
        }

        if mismatched_sections.is_empty() && missing_bibs.is_empty() && extra_bibs.is_empty() {
            continue;
        }

        let mut parts = Vec::new();
        if !mismatched_sections.is_empty() {
            parts.push(format!(
                "order differs from baseline in {}",
                mismatched_sections.join(", ")
            ));
        }
        for (section, bibs) in &missing_bibs {
            parts.push(format!("{} is missing bibs {:?}", section, bibs));
        }
        for (section, bibs) in &extra_bibs {
            parts.push(format!("{} has extra bibs {:?}", section, bibs));
        }

        findings.push(Finding::new(
            FindingKind::SectionPassageOrder,
            format!(
                "Group {} passage order inconsistent against baseline '{}': {}",
                group,
                baseline,
                parts.join("; ")
            ),
            FindingDetails::SectionPassageOrder {
                group,
                baseline: baseline.clone(),
                mismatched_sections,
                missing_bibs,
                extra_bibs,
            },
        ));
    }

    findings
}

/// Check 4: each bib must visit a group's sections in definition order
///
/// Reports adjacent-pair inversions and sections lying strictly between
/// the first and last visited positions that were never visited.
pub(crate) fn check_bib_passage_order(
    records: &[RawTimingRecord],
    sections: &[Section],
    statuses: &SectionStatusMap,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let groups = grouped_sections(sections);

    for (group, group_sections) in &groups {
        let positions: BTreeMap<&str, usize> = group_sections
            .iter()
            .enumerate()
            .map(|(idx, section)| (section.name.as_str(), idx))
            .collect();

        // bib -> visited section names of this group, first occurrence wins
        let mut visits: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for record in records {
            if !positions.contains_key(record.section.as_str()) {
                continue;
            }
            if statuses.contains_key(&(record.bib, record.section.clone())) {
                continue;
            }
            let visited = visits.entry(record.bib).or_default();
            if !visited.contains(&record.section) {
                visited.push(record.section.clone());
            }
        }

        for (bib, visited) in visits {
            if visited.len() < 2 {
                continue;
            }

            let mut inversions = Vec::new();
            for pair in visited.windows(2) {
                if positions[pair[1].as_str()] < positions[pair[0].as_str()] {
                    inversions.push((pair[0].clone(), pair[1].clone()));
                }
            }

            let visited_positions: BTreeSet<usize> = visited
                .iter()
                .map(|name| positions[name.as_str()])
                .collect();
            let first = *visited_positions.iter().next().unwrap_or(&0);
            let last = *visited_positions.iter().next_back().unwrap_or(&0);
            let skipped_sections: Vec<String> = (first..=last)
                .filter(|position| !visited_positions.contains(position))
                .map(|position| group_sections[position].name.clone())
                .collect();

            if inversions.is_empty() && skipped_sections.is_empty() {
                continue;
            }

            let mut parts = Vec::new();
            for (before, after) in &inversions {
                parts.push(format!("visited {} after {}", after, before));
            }
            if !skipped_sections.is_empty() {
                parts.push(format!("never visited {}", skipped_sections.join(", ")));
            }

            findings.push(Finding::new(
                FindingKind::BibPassageOrder,
                format!(
                    "Bib {} passed group {} out of order: {}",
                    bib,
                    group,
                    parts.join("; ")
                ),
                FindingDetails::BibPassageOrder {
                    group: *group,
                    bib,
                    inversions,
                    skipped_sections,
                },
            ));
        }
    }

    findings
}

/// Check 5: a RIT or BLNK status must not coexist with recorded times
pub(crate) fn check_status_with_time(
    records: &[RawTimingRecord],
    statuses: &SectionStatusMap,
) -> Vec<Finding> {
    let mut overrides: Vec<(&(u32, String), _)> = statuses.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));

    let mut findings = Vec::new();
    for ((bib, section), status) in overrides {
        if !status.bypasses_timing() {
            continue;
        }

        let has_start = records
            .iter()
            .any(|r| r.bib == *bib && &r.section == section && r.leg == Leg::Start);
        let has_goal = records
            .iter()
            .any(|r| r.bib == *bib && &r.section == section && r.leg == Leg::Goal);
        if !has_start && !has_goal {
            continue;
        }

        let which = match (has_start, has_goal) {
            (true, true) => "both START and GOAL times",
            (true, false) => "a START time",
            _ => "a GOAL time",
        };
        findings.push(Finding::new(
            FindingKind::StatusWithTime,
            format!(
                "Bib {} is marked {} in section '{}' but has {} recorded",
                bib, status, section, which
            ),
            FindingDetails::StatusWithTime {
                section: section.clone(),
                bib: *bib,
                status: *status,
                has_start,
                has_goal,
            },
        ));
    }

    findings
}

/// Check 6: rows timed by hand (lane marker "T") need confirmation
pub(crate) fn check_manual_timing(records: &[RawTimingRecord]) -> Vec<Finding> {
    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut findings = Vec::new();

    for record in records {
        if record.lane.as_deref() != Some(MANUAL_LANE_MARKER) {
            continue;
        }
        if !seen.insert((record.file.clone(), record.bib)) {
            continue;
        }
        findings.push(Finding::new(
            FindingKind::ManualTiming,
            format!(
                "Bib {} in '{}' was timed manually; confirm the override was intentional",
                record.bib, record.file
            ),
            FindingDetails::ManualTiming {
                file: record.file.clone(),
                section: record.section.clone(),
                bib: record.bib,
            },
        ));
    }

    findings
}

/// Check 7: a checkpoint where most timed bibs look wrong
///
/// A PC section where at least half the timed bibs deviate a full second
/// from target, or a CO section where at least half score zero, points at
/// an instrumentation fault rather than driver error. PCG sections measure
/// no hardware of their own and are excluded.
pub(crate) fn check_measurement_deficiency(
    sections: &[Section],
    engine: &CalculationEngine<'_>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for section in sections {
        let kind = section.effective_kind();
        if !matches!(kind, ScoringKind::Pc | ScoringKind::Co) {
            continue;
        }

        let results = engine.section_results(&section.name);
        let timed: Vec<_> = results
            .iter()
            .filter(|(_, r)| r.status.is_none() && r.passage_time.is_some())
            .collect();
        if timed.is_empty() {
            continue;
        }

        let deviating = timed
            .iter()
            .filter(|(_, r)| match kind {
                ScoringKind::Pc => r
                    .diff
                    .is_some_and(|d| d.abs() >= PC_DEVIATION_THRESHOLD_SECONDS),
                _ => r.point == 0,
            })
            .count();

        if (deviating as f64) < (timed.len() as f64) * MEASUREMENT_DEFICIENCY_RATIO {
            continue;
        }

        findings.push(Finding::new(
            FindingKind::MeasurementDeficiency,
            format!(
                "Section '{}': {} of {} timed bibs deviate; the checkpoint measurement is suspect",
                section.name,
                deviating,
                timed.len()
            ),
            FindingDetails::MeasurementDeficiency {
                section: section.name.clone(),
                timed: timed.len(),
                deviating,
            },
        ));
    }

    findings
}
