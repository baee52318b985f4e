//! Tests for the PC / CO / PCG scoring rules

use super::{load_standard_event, write_standard_event};
use crate::app::models::{ScoringKind, Status};
use crate::app::services::calculation_engine::CalculationEngine;

#[test]
fn test_pc_ranks_by_absolute_diff() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // PC1 diffs: bib 1 -> 0, bib 2 -> +2, bib 7 -> -2
    let r1 = engine.result(1, "PC1").unwrap();
    assert_eq!(r1.rank, Some(1));
    assert_eq!(r1.point, 100);
    assert!((r1.diff.unwrap() - 0.0).abs() < 1e-9);

    // Equal |diff| of 2.0: the lower bib takes the earlier rank
    assert_eq!(engine.result(2, "PC1").unwrap().rank, Some(2));
    assert_eq!(engine.result(2, "PC1").unwrap().point, 80);
    assert_eq!(engine.result(7, "PC1").unwrap().rank, Some(3));
    assert_eq!(engine.result(7, "PC1").unwrap().point, 60);
}

#[test]
fn test_pc_ranks_are_contiguous() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    for section in store.section_order() {
        if !ScoringKind::from_section_name(&section).is_ranked() {
            continue;
        }
        let mut ranks: Vec<u32> = engine
            .section_results(&section)
            .iter()
            .filter_map(|(_, r)| r.rank)
            .collect();
        ranks.sort_unstable();
        let timed = engine
            .section_results(&section)
            .iter()
            .filter(|(_, r)| r.passage_time.is_some() && r.status.is_none())
            .count();
        assert_eq!(ranks, (1..=timed as u32).collect::<Vec<_>>());
    }
}

#[test]
fn test_pc_without_data_keeps_empty_row() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // Bib 7 has no PC2 data at all
    let result = engine.result(7, "PC2").unwrap();
    assert!(result.passage_time.is_none());
    assert!(result.rank.is_none());
    assert_eq!(result.point, 0);
    assert!(result.status.is_none());
}

#[test]
fn test_co_clear_window() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // diff 0 clears, diff -1 (early) does not, diff +59.5 clears
    assert_eq!(engine.result(1, "CO1").unwrap().point, 500);
    assert_eq!(engine.result(2, "CO1").unwrap().point, 0);
    assert_eq!(engine.result(7, "CO1").unwrap().point, 500);

    // CO never ranks
    for (_, result) in engine.section_results("CO1") {
        assert!(result.rank.is_none());
    }
}

#[test]
fn test_co_custom_bonus() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::with_co_point(&store, &parser, 250);
    engine.calculate_all();

    assert_eq!(engine.result(1, "CO1").unwrap().point, 250);
}

#[test]
fn test_pcg_spans_group_endpoints() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    // PC1 START to PC2 GOAL: bib 1 -> 1319 s, bib 2 -> 1324 s, target 1320
    let r1 = engine.result(1, "PCG1").unwrap();
    assert!((r1.passage_time.unwrap() - 1319.0).abs() < 1e-9);
    assert_eq!(r1.rank, Some(1));
    assert_eq!(r1.point, 100);

    let r2 = engine.result(2, "PCG1").unwrap();
    assert_eq!(r2.rank, Some(2));
    assert_eq!(r2.point, 80);

    // Bib 7 lacks the GOAL anchor
    let r7 = engine.result(7, "PCG1").unwrap();
    assert!(r7.passage_time.is_none());
    assert!(r7.rank.is_none());
}

#[test]
fn test_pcg_thin_group_produces_no_results() {
    let (settings, race) = write_standard_event();
    std::fs::write(
        settings.path().join("section.csv"),
        "type,section,name,time,GROUP\n\
         PC,PC1,Stage 1,90,1\n\
         PCG,PCG1,Group 1 total,1320,1\n",
    )
    .unwrap();

    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    assert!(engine.result(1, "PCG1").is_none());
    assert!(engine.section_results("PCG1").is_empty());
    // The PC section itself still scores
    assert!(engine.result(1, "PC1").is_some());
}

#[test]
fn test_status_bypass_overrides_timing() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.set_section_status(7, "PC1", Status::Rit);
    engine.calculate_all();

    let result = engine.result(7, "PC1").unwrap();
    assert_eq!(result.status, Some(Status::Rit));
    assert_eq!(result.point, 0);
    assert!(result.passage_time.is_none());
    assert!(result.diff.is_none());
    assert!(result.rank.is_none());

    // The remaining pool reranks without the retired bib
    assert_eq!(engine.result(1, "PC1").unwrap().rank, Some(1));
    assert_eq!(engine.result(2, "PC1").unwrap().rank, Some(2));
}

#[test]
fn test_not_classified_keeps_time_but_not_rank() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.set_section_status(7, "PC1", Status::NotClassified);
    engine.calculate_all();

    let result = engine.result(7, "PC1").unwrap();
    assert_eq!(result.status, Some(Status::NotClassified));
    assert!((result.passage_time.unwrap() - 88.0).abs() < 1e-9);
    assert!((result.diff.unwrap() + 2.0).abs() < 1e-9);
    assert!(result.rank.is_none());
    assert_eq!(result.point, 0);

    assert_eq!(engine.result(1, "PC1").unwrap().rank, Some(1));
    assert_eq!(engine.result(2, "PC1").unwrap().rank, Some(2));
}

#[test]
fn test_status_on_co_section() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.set_section_status(1, "CO1", Status::Blank);
    engine.calculate_all();

    let result = engine.result(1, "CO1").unwrap();
    assert_eq!(result.status, Some(Status::Blank));
    assert_eq!(result.point, 0);
    assert!(result.passage_time.is_none());
}

#[test]
fn test_roster_only_bibs_get_rows() {
    let (settings, race) = write_standard_event();
    std::fs::write(
        settings.path().join("entries.csv"),
        "No,DriverName,DriverAge,CoDriverName,CoDriverAge,CarName,CarYear,CarClass,Coef,AgeCoef\n\
         1,Alpha,50,A2,45,Car A,1964,C,1.0,1.0\n\
         99,Late,40,L2,38,Car L,1970,D,1.0,1.0\n",
    )
    .unwrap();

    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.calculate_all();

    assert!(engine.bib_universe().contains(&99));
    let result = engine.result(99, "PC1").unwrap();
    assert!(result.passage_time.is_none());
    assert_eq!(result.point, 0);
}

#[test]
fn test_calculate_all_is_idempotent() {
    let (settings, race) = write_standard_event();
    let (store, parser) = load_standard_event(settings.path(), race.path());
    let mut engine = CalculationEngine::new(&store, &parser);
    engine.set_section_status(7, "PC2", Status::Rit);

    engine.calculate_all();
    let first = engine.results().clone();

    engine.calculate_all();
    assert_eq!(engine.results(), &first);
}
