//! Data models for rally scoring
//!
//! This module contains the core data structures for competitors, sections,
//! raw timing observations, per-section results and manual status overrides.

use crate::constants::status_codes;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Competitor (roster entry)
// =============================================================================

/// One roster entry, keyed by bib number
///
/// Competitors are loaded once from the entries table and are immutable for
/// the duration of a run. Name and car fields default to empty when the
/// source column is absent or blank; coefficients default to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Unique bib number - primary key for competitor lookups
    pub bib: u32,

    pub driver_name: String,
    pub driver_age: u32,
    pub co_driver_name: String,
    pub co_driver_age: u32,

    pub car_name: String,
    pub car_year: u32,
    pub car_class: String,

    /// Scoring coefficient applied to the PC/PCG point total
    pub coefficient: f64,

    /// Age coefficient applied to the PC/PCG point total
    pub age_coefficient: f64,
}

// =============================================================================
// Sections
// =============================================================================

/// Scoring rule applied to a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringKind {
    /// Precision time trial: ranked by closeness to the target time
    Pc,

    /// Checkpoint clear: fixed bonus within a one-minute window at target
    Co,

    /// Grouped time trial spanning the PC checkpoints of one group
    Pcg,

    /// Not a scored section; ignored by the calculation engine
    Unknown,
}

impl ScoringKind {
    /// Derive the scoring kind from a section name prefix
    ///
    /// `PCG` must be tested before `PC` since it shares the prefix.
    pub fn from_section_name(name: &str) -> Self {
        if name.starts_with("PCG") {
            ScoringKind::Pcg
        } else if name.starts_with("PC") {
            ScoringKind::Pc
        } else if name.starts_with("CO") {
            ScoringKind::Co
        } else {
            ScoringKind::Unknown
        }
    }

    /// Whether this kind participates in per-section ranking
    pub fn is_ranked(self) -> bool {
        matches!(self, ScoringKind::Pc | ScoringKind::Pcg)
    }
}

impl FromStr for ScoringKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "PC" => Ok(ScoringKind::Pc),
            "CO" => Ok(ScoringKind::Co),
            "PCG" => Ok(ScoringKind::Pcg),
            other => Err(Error::settings_load(format!(
                "Unknown section type '{}': must be PC, CO or PCG",
                other
            ))),
        }
    }
}

impl fmt::Display for ScoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringKind::Pc => "PC",
            ScoringKind::Co => "CO",
            ScoringKind::Pcg => "PCG",
            ScoringKind::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// One timed section of the event, as defined in the section table
///
/// Section order is significant: the `position` field preserves the row
/// order of the section table, which drives both calculation order and
/// passage-order validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Unique section name (e.g. "PC3"), also encodes the scoring kind
    pub name: String,

    /// Scoring kind as declared in the section table's type column
    pub kind: ScoringKind,

    /// Human-readable display name
    pub display_name: String,

    /// Target time in whole seconds
    pub target_time: i64,

    /// Group number chaining sections for PCG scoring and order checks
    pub group: u32,

    /// Optional day number for day-scoped sub-leaderboards
    pub day: Option<u32>,

    /// Row index in the section table (load order)
    pub position: usize,
}

impl Section {
    /// The scoring kind actually used by the engine, derived from the name
    pub fn effective_kind(&self) -> ScoringKind {
        ScoringKind::from_section_name(&self.name)
    }
}

// =============================================================================
// Status overrides
// =============================================================================

/// Manual status override replacing normal scoring for a section or overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Retired
    #[serde(rename = "RIT")]
    Rit,

    /// Not classified: passage time and diff still computed, ranking skipped
    #[serde(rename = "N.C.")]
    NotClassified,

    /// No-show
    #[serde(rename = "BLNK")]
    Blank,
}

impl Status {
    /// Whether this status suppresses timing entirely
    ///
    /// `Rit` and `Blank` produce a status-only result with no time or diff.
    /// `NotClassified` keeps the measured time but leaves the bib unranked.
    pub fn bypasses_timing(self) -> bool {
        matches!(self, Status::Rit | Status::Blank)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Rit => status_codes::RETIRED,
            Status::NotClassified => status_codes::NOT_CLASSIFIED,
            Status::Blank => status_codes::BLANK,
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            status_codes::RETIRED => Ok(Status::Rit),
            status_codes::NOT_CLASSIFIED => Ok(Status::NotClassified),
            status_codes::BLANK => Ok(Status::Blank),
            other => Err(Error::configuration(format!(
                "Unknown status code '{}': must be {}, {} or {}",
                other,
                status_codes::RETIRED,
                status_codes::NOT_CLASSIFIED,
                status_codes::BLANK
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flat section-level override map keyed by (bib, section name)
pub type SectionStatusMap = HashMap<(u32, String), Status>;

// =============================================================================
// Raw timing observations
// =============================================================================

/// Which endpoint of a section a timestamp belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    Start,
    Goal,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Start => write!(f, "START"),
            Leg::Goal => write!(f, "GOAL"),
        }
    }
}

/// One START or GOAL timestamp observation for one (bib, section)
///
/// Records carry a global sequence number assigned in parse order; with
/// files processed in sorted filename order this makes the observed arrival
/// order deterministic across runs, which the passage-order validation
/// checks rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTimingRecord {
    /// Global parse-order sequence number
    pub seq: usize,

    /// Source file name (basename)
    pub file: String,

    pub section: String,
    pub leg: Leg,
    pub bib: u32,

    /// Verbatim time string from the file; validated only when used
    pub time: String,

    /// Lane/type column value, when the file has a lane column
    pub lane: Option<String>,
}

// =============================================================================
// Results
// =============================================================================

/// Computed outcome for one (bib, section) cell of the result grid
///
/// Recreated wholesale on every calculation run; only status overrides
/// survive between runs, and those live in the persisted configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionResult {
    /// Elapsed GOAL minus START in seconds
    pub passage_time: Option<f64>,

    /// Passage time minus the section target, signed seconds
    pub diff: Option<f64>,

    /// Rank within the section, PC/PCG only
    pub rank: Option<u32>,

    /// Points awarded, zero by default
    pub point: i64,

    /// Manual override recorded on this cell, if any
    pub status: Option<Status>,
}

impl SectionResult {
    /// A result cell holding only a status override
    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
