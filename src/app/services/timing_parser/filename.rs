//! Section and event inference from timing file names
//!
//! A timing file name (minus extension) encodes which section endpoints it
//! carries: the basename is split on `_` and each part is matched against
//! `<section><START|GOAL>` where the section is uppercase letters followed
//! by digits. `PC1GOAL_PC2START.csv` therefore feeds two maps at once.

use crate::app::models::Leg;
use regex::Regex;
use std::sync::OnceLock;

static SECTION_EVENT_RE: OnceLock<Regex> = OnceLock::new();

fn section_event_re() -> &'static Regex {
    SECTION_EVENT_RE.get_or_init(|| {
        Regex::new(r"^([A-Z]+\d+)(START|GOAL)$").expect("section/event pattern is valid")
    })
}

/// Extract the (section, leg) pairs encoded in a file stem
///
/// Parts that do not match the pattern are ignored; an empty result means
/// the file carries no timing data and is skipped by the parser.
pub fn infer_section_events(stem: &str) -> Vec<(String, Leg)> {
    stem.split('_')
        .filter_map(|part| {
            let captures = section_event_re().captures(part)?;
            let section = captures.get(1)?.as_str().to_string();
            let leg = match captures.get(2)?.as_str() {
                "START" => Leg::Start,
                _ => Leg::Goal,
            };
            Some((section, leg))
        })
        .collect()
}

/// Split a file stem into its raw `_`-separated tokens
///
/// Used by the duplicate-filename validation check, which flags section
/// tokens claimed by more than one file.
pub fn filename_tokens(stem: &str) -> Vec<String> {
    stem.split('_')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
