//! Test modules and shared fixtures for the calculation engine

pub mod aggregate_tests;
pub mod scoring_tests;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::app::services::settings_store::SettingsStore;
use crate::app::services::timing_parser::TimingParser;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A small three-competitor event with one PC group, a PCG and a CO
///
/// Expected raw timings: PC1 90 / 92 / 88 s, PC2 119 / 124 s (bib 7 has no
/// PC2 data), PCG1 1319 / 1324 s, CO1 diffs 0 / -1 / +59.5 s.
pub(crate) fn write_standard_event() -> (TempDir, TempDir) {
    let settings = TempDir::new().unwrap();
    write_file(
        settings.path(),
        "entries.csv",
        "No,DriverName,DriverAge,CoDriverName,CoDriverAge,CarName,CarYear,CarClass,Coef,AgeCoef\n\
         1,Alpha,50,A2,45,Car A,1964,C,1.0,1.0\n\
         2,Beta,55,B2,50,Car B,1959,B,1.0,1.0\n\
         7,Gamma,60,C2,58,Car C,1955,A,1.5,1.0\n",
    );
    write_file(settings.path(), "point.csv", "Order,Point\n1,100\n2,80\n3,60\n");
    write_file(
        settings.path(),
        "section.csv",
        "type,section,name,time,GROUP,DAY\n\
         PC,PC1,Stage 1,90,1,1\n\
         PC,PC2,Stage 2,120,1,1\n\
         PCG,PCG1,Group 1 total,1320,1,1\n\
         CO,CO1,Checkpoint 1,300,2,2\n",
    );

    let race = TempDir::new().unwrap();
    write_file(
        race.path(),
        "PC1START.csv",
        "lane,time,number\nA,09:00:00.00,1\nA,09:05:00.00,2\nA,09:10:00.00,7\n",
    );
    write_file(
        race.path(),
        "PC1GOAL.csv",
        "lane,time,number\nA,09:01:30.00,1\nA,09:06:32.00,2\nA,09:11:28.00,7\n",
    );
    write_file(
        race.path(),
        "PC2START.csv",
        "lane,time,number\nA,09:20:00,1\nA,09:25:00,2\n",
    );
    write_file(
        race.path(),
        "PC2GOAL.csv",
        "lane,time,number\nA,09:21:59,1\nA,09:27:04,2\n",
    );
    write_file(
        race.path(),
        "CO1START.csv",
        "lane,time,number\nA,09:30:00,1\nA,09:40:00,2\nA,09:50:00,7\n",
    );
    write_file(
        race.path(),
        "CO1GOAL.csv",
        "lane,time,number\nA,09:35:00,1\nA,09:44:59,2\nA,09:55:59.50,7\n",
    );

    (settings, race)
}

/// Load the fixture folders into a store and a parsed timing parser
pub(crate) fn load_standard_event(settings: &Path, race: &Path) -> (SettingsStore, TimingParser) {
    let store = SettingsStore::load(settings).unwrap();
    let mut parser = TimingParser::new(race);
    parser.parse_all().unwrap();
    (store, parser)
}
