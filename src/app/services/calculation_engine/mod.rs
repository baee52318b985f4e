//! Calculation engine for passage times, differentials, ranks and points
//!
//! This module populates the result grid from the settings store and the
//! timing parser, dispatching every section to its scoring rule, and
//! exposes the aggregate scoring queries.
//!
//! ## Architecture
//!
//! - [`scoring`] - The PC / CO / PCG per-section scoring rules
//! - [`aggregate`] - Score aggregation with coefficients and formatting
//!
//! Engine state, the calculation pass and status-override handling live in
//! this module.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use crate::app::models::{ScoringKind, SectionResult, SectionStatusMap, Status};
use crate::app::services::settings_store::SettingsStore;
use crate::app::services::timing_parser::TimingParser;
use crate::config::AppConfig;
use crate::constants::DEFAULT_CO_POINT;

pub mod aggregate;
pub mod scoring;

#[cfg(test)]
pub mod tests;

pub use aggregate::{format_diff, format_time};

/// Calculation engine over loaded settings and parsed timing data
///
/// The result grid is recreated wholesale by every [`calculate_all`]
/// invocation; the only state that survives between runs is the injected
/// status-override maps, which belong to the persisted configuration.
///
/// [`calculate_all`]: CalculationEngine::calculate_all
#[derive(Debug, Clone)]
pub struct CalculationEngine<'a> {
    pub(crate) settings: &'a SettingsStore,
    pub(crate) timing: &'a TimingParser,

    /// Points awarded for clearing a CO checkpoint
    pub(crate) co_point: i64,

    /// Result grid keyed by (bib, section name)
    ///
    /// A BTreeMap keeps iteration deterministic: ascending bib, then
    /// section name. Ascending bib order is the documented tie-break for
    /// equal |diff| in the ranking pools.
    pub(crate) results: BTreeMap<(u32, String), SectionResult>,

    /// Injected section-level status overrides
    pub(crate) section_status: SectionStatusMap,

    /// Injected final/overall status overrides
    pub(crate) final_status: HashMap<u32, Status>,

    /// Bib universe of the last calculation run, ascending
    pub(crate) bib_universe: Vec<u32>,
}

impl<'a> CalculationEngine<'a> {
    /// Create an engine with the default CO clear bonus
    pub fn new(settings: &'a SettingsStore, timing: &'a TimingParser) -> Self {
        Self::with_co_point(settings, timing, DEFAULT_CO_POINT)
    }

    /// Create an engine with a custom CO clear bonus
    pub fn with_co_point(
        settings: &'a SettingsStore,
        timing: &'a TimingParser,
        co_point: i64,
    ) -> Self {
        Self {
            settings,
            timing,
            co_point,
            results: BTreeMap::new(),
            section_status: SectionStatusMap::new(),
            final_status: HashMap::new(),
            bib_universe: Vec::new(),
        }
    }

    pub fn co_point(&self) -> i64 {
        self.co_point
    }

    /// Inject both override maps from the persisted configuration
    pub fn load_overrides(&mut self, config: &AppConfig) {
        self.section_status = config.section_status_pairs();
        self.final_status = config.final_status_pairs();
    }

    /// Set a section-level status override for one (bib, section)
    pub fn set_section_status(&mut self, bib: u32, section: &str, status: Status) {
        self.section_status
            .insert((bib, section.to_string()), status);
    }

    /// Remove a section-level status override
    pub fn clear_section_status(&mut self, bib: u32, section: &str) {
        self.section_status.remove(&(bib, section.to_string()));
    }

    /// Set a final/overall status override for one bib
    pub fn set_final_status(&mut self, bib: u32, status: Status) {
        self.final_status.insert(bib, status);
    }

    /// Final/overall status override for a bib, if any
    pub fn final_status(&self, bib: u32) -> Option<Status> {
        self.final_status.get(&bib).copied()
    }

    /// Section-level status override for a (bib, section), if any
    pub fn status_for(&self, bib: u32, section: &str) -> Option<Status> {
        self.section_status.get(&(bib, section.to_string())).copied()
    }

    /// The injected section-level override map
    pub fn section_status_map(&self) -> &SectionStatusMap {
        &self.section_status
    }

    /// Recompute the entire result grid
    ///
    /// The bib universe is the union of bibs observed by the timing parser
    /// and bibs registered in the roster. Sections are processed strictly
    /// in section-table order; sections whose name encodes no known scoring
    /// kind are ignored. Re-running with unchanged inputs reproduces the
    /// grid exactly.
    pub fn calculate_all(&mut self) {
        self.results.clear();

        let mut bibs: BTreeSet<u32> = self.timing.bibs().into_iter().collect();
        bibs.extend(self.settings.bibs());
        self.bib_universe = bibs.into_iter().collect();

        for section in self.settings.section_order() {
            match ScoringKind::from_section_name(&section) {
                ScoringKind::Pc => self.score_pc(&section),
                ScoringKind::Co => self.score_co(&section),
                ScoringKind::Pcg => self.score_pcg(&section),
                ScoringKind::Unknown => {
                    debug!("Section '{}' has no scoring kind, ignored", section);
                }
            }
        }

        info!(
            "Calculated {} result cells for {} bibs over {} sections",
            self.results.len(),
            self.bib_universe.len(),
            self.settings.section_count()
        );
    }

    /// One cell of the result grid
    pub fn result(&self, bib: u32, section: &str) -> Option<&SectionResult> {
        self.results.get(&(bib, section.to_string()))
    }

    /// The whole result grid, ascending bib then section name
    pub fn results(&self) -> &BTreeMap<(u32, String), SectionResult> {
        &self.results
    }

    /// All result cells of one section, ascending bib
    pub fn section_results(&self, section: &str) -> Vec<(u32, &SectionResult)> {
        self.results
            .iter()
            .filter(|((_, name), _)| name == section)
            .map(|((bib, _), result)| (*bib, result))
            .collect()
    }

    /// Bib universe of the last calculation run, ascending
    pub fn bib_universe(&self) -> &[u32] {
        &self.bib_universe
    }
}
