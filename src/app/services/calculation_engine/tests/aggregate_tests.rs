//! Tests for score aggregation and formatting

use super::{load_standard_event, write_standard_event};
use crate::app::models::{Competitor, SectionResult, Status};
use crate::app::services::calculation_engine::{CalculationEngine, format_diff, format_time};
use crate::app::services::settings_store::SettingsStore;
use crate::app::services::timing_parser::TimingParser;

fn competitor(bib: u32, coefficient: f64, age_coefficient: f64) -> Competitor {
    Competitor {
        bib,
        driver_name: String::new(),
        driver_age: 0,
        co_driver_name: String::new(),
        co_driver_age: 0,
        car_name: String::new(),
        car_year: 0,
        car_class: String::new(),
        coefficient,
        age_coefficient,
    }
}

fn scored(point: i64) -> SectionResult {
    SectionResult {
        point,
        ..SectionResult::default()
    }
}

#[test]
fn test_total_score_formula() {
    let mut store = SettingsStore::default();
    store.competitors.insert(7, competitor(7, 1.5, 1.0));
    let parser = TimingParser::default();

    let mut engine = CalculationEngine::new(&store, &parser);
    engine.results.insert((7, "PC1".to_string()), scored(60));
    engine.results.insert((7, "PCG1".to_string()), scored(40));
    engine.results.insert((7, "CO1".to_string()), scored(20));

    // int(100 * 1.5 * 1.0 + 20) == 170
    assert_eq!(engine.total_score(7), 170);
    assert_eq!(engine.pure_score(7), 120);
}

#[test]
fn test_total_score_truncates_toward_zero() {
    let mut store = SettingsStore::default();
    store.competitors.insert(3, competitor(3, 1.1, 1.05));
    let parser = TimingParser::default();

    let mut engine = CalculationEngine::new(&store, &parser);
    engine.results.insert((3, "PC1".to_string()), scored(85));

    // 85 * 1.1 * 1.05 = 98.175 -> 98
    assert_eq!(engine.total_score(3), 98);
}

#[test]
fn test_total_score_unregistered_bib() {
    let store = SettingsStore::default();
    let parser = TimingParser::default();

    let mut engine = CalculationEngine::new(&store, &parser);
    engine.results.insert((9, "PC1".to_string()), scored(100));

    assert_eq!(engine.total_score(9), 0);
    // The plain sum still counts unregistered bibs
    assert_eq!(engine.pure_score(9), 100);
}

#[test]
fn test_total_score_computed_under_final_status() {
    let mut store = SettingsStore::default();
    store.competitors.insert(5, competitor(5, 1.0, 1.0));
    let parser = TimingParser::default();

    let mut engine = CalculationEngine::new(&store, &parser);
    engine.results.insert((5, "PC1".to_string()), scored(80));
    engine.set_final_status(5, Status::Rit);

    assert_eq!(engine.final_status(5), Some(Status::Rit));
    assert_eq!(engine.total_score(5), 80);
}

#[test]
fn test_score_for_sections_subsets() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // Day 1 holds the PC/PCG sections, day 2 the CO checkpoint
    let day1 = store.sections_for_day(1).to_vec();
    let day2 = store.sections_for_day(2).to_vec();

    assert_eq!(engine.score_for_sections(1, &day1), 300);
    assert_eq!(engine.score_for_sections(1, &day2), 500);
    assert_eq!(
        engine.score_for_sections(1, &store.section_order()),
        engine.total_score(1)
    );

    // Unknown section names are silently skipped
    assert_eq!(
        engine.score_for_sections(1, &["PC9".to_string()]),
        0
    );
}

#[test]
fn test_standard_event_totals() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // Bib 1: PC 100+100, PCG 100, CO 500 with coefficient 1.0
    assert_eq!(engine.pure_score(1), 800);
    assert_eq!(engine.total_score(1), 800);

    // Bib 7: PC 60, CO 500 with coefficient 1.5
    assert_eq!(engine.pure_score(7), 560);
    assert_eq!(engine.total_score(7), 590);
}

#[test]
fn test_format_time() {
    assert_eq!(format_time(Some(90.5)), "00:01:30.50");
    assert_eq!(format_time(Some(0.0)), "00:00:00.00");
    assert_eq!(format_time(Some(3661.25)), "01:01:01.25");
    assert_eq!(format_time(None), "-");
}

#[test]
fn test_format_diff() {
    assert_eq!(format_diff(Some(2.0)), "+00:00:02.00");
    assert_eq!(format_diff(Some(-2.0)), "-00:00:02.00");
    assert_eq!(format_diff(Some(0.0)), "+00:00:00.00");
    assert_eq!(format_diff(None), "-");
}
