//! Persisted application configuration
//!
//! Folders, the CO bonus value, the manual status-override maps and the
//! operator's confirmed-finding keys live in a JSON file next to the event
//! data. The core never derives this state; it is injected into the
//! calculation engine and the validator before each run and written back
//! by the driving layer.

use crate::app::models::{SectionStatusMap, Status};
use crate::constants::DEFAULT_CO_POINT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration persisted as JSON
///
/// Missing files load as defaults, so a fresh working directory needs no
/// setup step. Unknown fields in an existing file are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Points awarded for clearing a CO checkpoint
    pub co_point: i64,

    /// Folder holding the timing CSV files
    pub race_folder: PathBuf,

    /// Folder holding the entries/point/section tables
    pub settings_folder: PathBuf,

    /// Section-level overrides: bib -> section name -> status
    pub status_map: BTreeMap<u32, BTreeMap<String, Status>>,

    /// Final/overall overrides: bib -> status
    pub final_status: BTreeMap<u32, Status>,

    /// Comparison keys of findings the operator has acknowledged
    pub confirmed_findings: BTreeSet<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            co_point: DEFAULT_CO_POINT,
            race_folder: PathBuf::from("race"),
            settings_folder: PathBuf::from("settings"),
            status_map: BTreeMap::new(),
            final_status: BTreeMap::new(),
            confirmed_findings: BTreeSet::new(),
        }
    }
}

impl AppConfig {
    /// Load the configuration file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Malformed configuration {}: {}", path.display(), e))
        })
    }

    /// Write the configuration file, pretty-printed
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            Error::configuration(format!("Failed to serialize configuration: {}", e))
        })?;
        std::fs::write(path, content)
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
        debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn set_section_status(&mut self, bib: u32, section: &str, status: Status) {
        self.status_map
            .entry(bib)
            .or_default()
            .insert(section.to_string(), status);
    }

    pub fn section_status(&self, bib: u32, section: &str) -> Option<Status> {
        self.status_map.get(&bib)?.get(section).copied()
    }

    pub fn clear_section_status(&mut self, bib: u32, section: &str) {
        if let Some(sections) = self.status_map.get_mut(&bib) {
            sections.remove(section);
            if sections.is_empty() {
                self.status_map.remove(&bib);
            }
        }
    }

    pub fn set_final_status(&mut self, bib: u32, status: Status) {
        self.final_status.insert(bib, status);
    }

    pub fn final_status(&self, bib: u32) -> Option<Status> {
        self.final_status.get(&bib).copied()
    }

    pub fn clear_final_status(&mut self, bib: u32) {
        self.final_status.remove(&bib);
    }

    /// Record an operator acknowledgement of a finding key
    pub fn confirm_finding(&mut self, key: impl Into<String>) {
        self.confirmed_findings.insert(key.into());
    }

    /// Withdraw an operator acknowledgement
    pub fn unconfirm_finding(&mut self, key: &str) {
        self.confirmed_findings.remove(key);
    }

    /// The section overrides flattened to the engine's composite-key form
    pub fn section_status_pairs(&self) -> SectionStatusMap {
        let mut pairs = SectionStatusMap::new();
        for (bib, sections) in &self.status_map {
            for (section, status) in sections {
                pairs.insert((*bib, section.clone()), *status);
            }
        }
        pairs
    }

    /// The final overrides as a flat map
    pub fn final_status_pairs(&self) -> HashMap<u32, Status> {
        self.final_status
            .iter()
            .map(|(bib, status)| (*bib, *status))
            .collect()
    }

    /// The confirmed finding keys as a lookup set
    pub fn confirmed_keys(&self) -> HashSet<String> {
        self.confirmed_findings.iter().cloned().collect()
    }
}
