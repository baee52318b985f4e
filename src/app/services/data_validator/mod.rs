//! Data validator for race timing integrity
//!
//! This module runs a fixed battery of consistency checks over the raw
//! timing records, the section definitions and (optionally) the computed
//! result grid, and returns structured findings. Every finding carries an
//! idempotent comparison key so that re-running validation after data edits
//! can recognise the same problem and preserve an operator's confirmation.
//!
//! The checks are stateless functions over supplied data; nothing in the
//! engine or parser is mutated.

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::app::models::{RawTimingRecord, Section, SectionStatusMap, Status};
use crate::app::services::calculation_engine::CalculationEngine;

pub mod checks;

#[cfg(test)]
pub mod tests;

/// The fixed set of integrity-problem categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    /// Two timing files claim the same section token
    DuplicateSourceFile,

    /// A bib occurs more than once in one section endpoint
    DuplicateBib,

    /// Sections of one group disagree on the bib arrival order
    SectionPassageOrder,

    /// A bib visited a group's sections out of definition order
    BibPassageOrder,

    /// A retired/no-show status coexists with recorded times
    StatusWithTime,

    /// A manually timed row needs operator confirmation
    ManualTiming,

    /// A checkpoint's measurements look systematically wrong
    MeasurementDeficiency,
}

impl FindingKind {
    /// Stable identifier used in comparison keys and reports
    pub fn slug(self) -> &'static str {
        match self {
            FindingKind::DuplicateSourceFile => "csv_duplicate",
            FindingKind::DuplicateBib => "bib_duplicate",
            FindingKind::SectionPassageOrder => "section_order",
            FindingKind::BibPassageOrder => "bib_order",
            FindingKind::StatusWithTime => "status_time",
            FindingKind::ManualTiming => "manual_timing",
            FindingKind::MeasurementDeficiency => "measurement_deficiency",
        }
    }

    /// Whether an operator may acknowledge this finding as resolved
    ///
    /// Duplicate files and duplicate bibs make event assignment ambiguous;
    /// they are hard errors that can only be fixed in the source data.
    pub fn confirmable(self) -> bool {
        !matches!(
            self,
            FindingKind::DuplicateSourceFile | FindingKind::DuplicateBib
        )
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Structured payload of one finding, specific to its kind
#[derive(Debug, Clone, PartialEq)]
pub enum FindingDetails {
    DuplicateSourceFile {
        token: String,
        files: Vec<String>,
    },
    DuplicateBib {
        section: String,
        bib: u32,
        start_count: usize,
        goal_count: usize,
    },
    SectionPassageOrder {
        group: u32,
        baseline: String,
        mismatched_sections: Vec<String>,
        missing_bibs: Vec<(String, Vec<u32>)>,
        extra_bibs: Vec<(String, Vec<u32>)>,
    },
    BibPassageOrder {
        group: u32,
        bib: u32,
        inversions: Vec<(String, String)>,
        skipped_sections: Vec<String>,
    },
    StatusWithTime {
        section: String,
        bib: u32,
        status: Status,
        has_start: bool,
        has_goal: bool,
    },
    ManualTiming {
        file: String,
        section: String,
        bib: u32,
    },
    MeasurementDeficiency {
        section: String,
        timed: usize,
        deviating: usize,
    },
}

/// One detected integrity problem
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    pub details: FindingDetails,

    /// Operator acknowledgement, tracked across re-validation via the key
    pub confirmed: bool,
}

impl Finding {
    pub(crate) fn new(kind: FindingKind, message: String, details: FindingDetails) -> Self {
        Self {
            kind,
            message,
            details,
            confirmed: false,
        }
    }

    /// Whether an operator may acknowledge this finding
    pub fn confirmable(&self) -> bool {
        self.kind.confirmable()
    }

    /// Idempotent comparison key: the same semantic problem always maps to
    /// the same key across runs, regardless of message wording
    pub fn key(&self) -> String {
        let slug = self.kind.slug();
        match &self.details {
            FindingDetails::DuplicateSourceFile { token, .. } => format!("{}:{}", slug, token),
            FindingDetails::DuplicateBib { section, bib, .. } => {
                format!("{}:{}:{}", slug, section, bib)
            }
            FindingDetails::SectionPassageOrder {
                group, baseline, ..
            } => format!("{}:{}:{}", slug, group, baseline),
            FindingDetails::BibPassageOrder { group, bib, .. } => {
                format!("{}:{}:{}", slug, group, bib)
            }
            FindingDetails::StatusWithTime { section, bib, .. } => {
                format!("{}:{}:{}", slug, section, bib)
            }
            FindingDetails::ManualTiming { file, bib, .. } => {
                format!("{}:{}:{}", slug, file, bib)
            }
            FindingDetails::MeasurementDeficiency { section, .. } => {
                format!("{}:{}", slug, section)
            }
        }
    }
}

/// Run the full check battery and return findings in check order
///
/// Checks 1-6 run over the raw data alone; the post-calculation
/// measurement check runs only when an engine with computed results is
/// supplied. Calling twice, first without and then with the engine, is the
/// documented two-pass protocol.
pub fn validate_all(
    race_dir: &Path,
    records: &[RawTimingRecord],
    sections: &[Section],
    statuses: &SectionStatusMap,
    engine: Option<&CalculationEngine<'_>>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    findings.extend(checks::check_duplicate_filenames(race_dir));
    findings.extend(checks::check_duplicate_bibs(records));
    findings.extend(checks::check_section_passage_order(
        records, sections, statuses,
    ));
    findings.extend(checks::check_bib_passage_order(records, sections, statuses));
    findings.extend(checks::check_status_with_time(records, statuses));
    findings.extend(checks::check_manual_timing(records));

    if let Some(engine) = engine {
        findings.extend(checks::check_measurement_deficiency(sections, engine));
    } else {
        debug!("No result grid supplied, skipping measurement deficiency check");
    }

    info!(
        "Validation produced {} findings ({} non-confirmable)",
        findings.len(),
        findings.iter().filter(|f| !f.confirmable()).count()
    );
    findings
}

/// Mark findings whose key the operator has already acknowledged
///
/// Non-confirmable findings are never marked, whatever the key set says.
pub fn apply_confirmations(findings: &mut [Finding], confirmed_keys: &HashSet<String>) {
    for finding in findings {
        if finding.confirmable() && confirmed_keys.contains(&finding.key()) {
            finding.confirmed = true;
        }
    }
}
