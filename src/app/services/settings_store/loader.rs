//! Settings table loading and file discovery
//!
//! Each table is located by a fuzzy filename pattern inside the settings
//! folder; loading fails with a descriptive message when a pattern matches
//! zero or more than one file, or when a required column is absent.

use super::SettingsStore;
use crate::app::models::{Competitor, ScoringKind, Section};
use crate::constants::{
    ENTRIES_FILE_PATTERN, POINTS_FILE_PATTERN, SECTIONS_FILE_PATTERN, points_columns,
    roster_columns, section_columns,
};
use crate::{Error, Result};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

impl SettingsStore {
    /// Load all three settings tables from a folder
    ///
    /// # Errors
    /// * `Error::SettingsLoad` when a table file is missing or ambiguous,
    ///   or a required column is absent
    /// * `Error::CsvParsing` for malformed CSV content
    pub fn load(settings_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = settings_dir.as_ref();
        info!("Loading settings from {}", dir.display());

        let mut store = SettingsStore {
            settings_dir: dir.to_path_buf(),
            ..SettingsStore::default()
        };

        store.load_entries()?;
        store.load_points()?;
        store.load_sections()?;
        store.build_indexes();
        store.warn_on_thin_pcg_groups();

        info!(
            "Settings loaded: {} competitors, {} point ranks, {} sections",
            store.competitors.len(),
            store.points.len(),
            store.sections.len()
        );
        Ok(store)
    }

    fn load_entries(&mut self) -> Result<()> {
        let path = find_unique_file(&self.settings_dir, ENTRIES_FILE_PATTERN)?;
        let file = file_label(&path);
        let (headers, rows) = read_table(&path)?;
        require_columns(&file, &headers, roster_columns::REQUIRED)?;

        let bib_idx = column_index(&headers, roster_columns::BIB);
        let driver_name_idx = column_index(&headers, roster_columns::DRIVER_NAME);
        let driver_age_idx = column_index(&headers, roster_columns::DRIVER_AGE);
        let co_name_idx = column_index(&headers, roster_columns::CO_DRIVER_NAME);
        let co_age_idx = column_index(&headers, roster_columns::CO_DRIVER_AGE);
        let car_name_idx = column_index(&headers, roster_columns::CAR_NAME);
        let car_year_idx = column_index(&headers, roster_columns::CAR_YEAR);
        let car_class_idx = column_index(&headers, roster_columns::CAR_CLASS);
        let coef_idx = column_index(&headers, roster_columns::COEFFICIENT);
        let age_coef_idx = column_index(&headers, roster_columns::AGE_COEFFICIENT);

        for row in &rows {
            // Rows without a bib number are padding and are skipped
            let Some(bib) = parse_int_cell(cell(row, bib_idx)) else {
                continue;
            };
            if bib <= 0 {
                continue;
            }

            let competitor = Competitor {
                bib: bib as u32,
                driver_name: cell(row, driver_name_idx).to_string(),
                driver_age: parse_int_cell(cell(row, driver_age_idx)).unwrap_or(0) as u32,
                co_driver_name: cell(row, co_name_idx).to_string(),
                co_driver_age: parse_int_cell(cell(row, co_age_idx)).unwrap_or(0) as u32,
                car_name: cell(row, car_name_idx).to_string(),
                car_year: parse_int_cell(cell(row, car_year_idx)).unwrap_or(0) as u32,
                car_class: cell(row, car_class_idx).to_string(),
                coefficient: parse_float_cell(cell(row, coef_idx)).unwrap_or(1.0),
                age_coefficient: parse_float_cell(cell(row, age_coef_idx)).unwrap_or(1.0),
            };
            self.competitors.insert(competitor.bib, competitor);
        }

        debug!("Loaded {} roster entries from {}", self.competitors.len(), file);
        Ok(())
    }

    fn load_points(&mut self) -> Result<()> {
        let path = find_unique_file(&self.settings_dir, POINTS_FILE_PATTERN)?;
        let file = file_label(&path);
        let (headers, rows) = read_table(&path)?;
        require_columns(&file, &headers, points_columns::REQUIRED)?;

        let rank_idx = column_index(&headers, points_columns::RANK);
        let point_idx = column_index(&headers, points_columns::POINT);

        for row in &rows {
            let rank = parse_int_cell(cell(row, rank_idx)).ok_or_else(|| {
                Error::settings_load(format!("{}: rank column holds a non-integer value", file))
            })?;
            let point = parse_int_cell(cell(row, point_idx)).ok_or_else(|| {
                Error::settings_load(format!("{}: point column holds a non-integer value", file))
            })?;
            self.points.insert(rank as u32, point);
        }

        debug!("Loaded {} point ranks from {}", self.points.len(), file);
        Ok(())
    }

    fn load_sections(&mut self) -> Result<()> {
        let path = find_unique_file(&self.settings_dir, SECTIONS_FILE_PATTERN)?;
        let file = file_label(&path);
        let (headers, rows) = read_table(&path)?;
        require_columns(&file, &headers, section_columns::REQUIRED)?;

        let kind_idx = column_index(&headers, section_columns::KIND);
        let name_idx = column_index(&headers, section_columns::SECTION);
        let display_idx = column_index(&headers, section_columns::NAME);
        let time_idx = column_index(&headers, section_columns::TARGET_TIME);
        let group_idx = column_index(&headers, section_columns::GROUP);
        let day_idx = column_index(&headers, section_columns::DAY);

        for (position, row) in rows.iter().enumerate() {
            let name = cell(row, name_idx).to_string();
            if name.is_empty() {
                continue;
            }

            let target_time = parse_int_cell(cell(row, time_idx)).ok_or_else(|| {
                Error::settings_load(format!(
                    "{}: section '{}' has a non-integer target time",
                    file, name
                ))
            })?;
            let group = parse_int_cell(cell(row, group_idx)).ok_or_else(|| {
                Error::settings_load(format!(
                    "{}: section '{}' has a non-integer group number",
                    file, name
                ))
            })?;

            self.sections.push(Section {
                kind: cell(row, kind_idx)
                    .parse::<ScoringKind>()
                    .unwrap_or(ScoringKind::Unknown),
                display_name: cell(row, display_idx).to_string(),
                target_time,
                group: group as u32,
                day: parse_int_cell(cell(row, day_idx)).map(|d| d as u32),
                position,
                name,
            });
        }

        debug!("Loaded {} sections from {}", self.sections.len(), file);
        Ok(())
    }

    /// Warn about PCG sections whose group cannot produce a grouped time
    ///
    /// A PCG section needs at least two PC sections in its group; thinner
    /// groups are skipped at calculation time, which is worth surfacing at
    /// load time.
    fn warn_on_thin_pcg_groups(&self) {
        for section in &self.sections {
            if section.effective_kind() == ScoringKind::Pcg
                && self.pc_sections_in_group(section.group).len() < 2
            {
                warn!(
                    "PCG section '{}' references group {} with fewer than 2 PC sections; it will produce no results",
                    section.name, section.group
                );
            }
        }
    }
}

/// Locate exactly one file matching a glob pattern inside a folder
fn find_unique_file(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let search = dir.join(pattern);
    let search_str = search.to_string_lossy();
    let mut matches: Vec<PathBuf> = glob::glob(&search_str)
        .map_err(|e| Error::settings_load(format!("Invalid pattern '{}': {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(Error::settings_load(format!(
            "No file matching '{}' found in {}",
            pattern,
            dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::settings_load(format!(
            "Multiple files match '{}' in {}: {}",
            pattern,
            dir.display(),
            matches
                .iter()
                .map(|p| file_label(p))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Read a settings table, tolerating a UTF-8 byte-order marker
fn read_table(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let file = file_label(path);
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

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| Error::csv_parsing(file.as_str(), "Failed to read record", Some(e)))?;
        rows.push(record);
    }

    Ok((headers, rows))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Index of a column by exact (trimmed) header name
fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_columns(file: &str, headers: &StringRecord, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| column_index(headers, name).is_none())
        .copied()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::settings_load(format!(
            "{}: missing required columns: {}",
            file,
            missing.join(", ")
        )))
    }
}

fn cell<'a>(record: &'a StringRecord, index: Option<usize>) -> &'a str {
    index
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .unwrap_or("")
}

/// Parse an integer cell, tolerating "7.0"-style float renderings
fn parse_int_cell(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().map(|v| v as i64)
}

fn parse_float_cell(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
