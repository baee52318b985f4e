//! Score command implementation
//!
//! Runs the full pipeline (settings, timing, calculation) and prints the
//! per-section result grid and the overall standings. Competitors carrying
//! a final status override keep their computed score but are listed after
//! the ranked field with the status shown in the rank column.

use colored::Colorize;
use tracing::info;

use super::shared::{resolve_context, setup_logging};
use crate::Result;
use crate::app::models::{ScoringKind, SectionResult, Status};
use crate::app::services::calculation_engine::{CalculationEngine, format_diff, format_time};
use crate::app::services::settings_store::SettingsStore;
use crate::app::services::timing_parser::TimingParser;
use crate::cli::args::ScoreArgs;

pub fn run_score(args: ScoreArgs) -> Result<()> {
    setup_logging(args.get_log_level())?;
    args.validate()?;

    let ctx = resolve_context(
        &args.config_file,
        args.settings_dir.as_deref(),
        args.race_dir.as_deref(),
    )?;

    let store = SettingsStore::load(&ctx.settings_dir)?;
    let mut parser = TimingParser::new(&ctx.race_dir);
    let summary = parser.parse_all()?;
    info!(
        "Parsed {} timing files, {} bibs",
        summary.files_parsed, summary.bib_count
    );

    let mut engine = CalculationEngine::with_co_point(&store, &parser, ctx.config.co_point);
    engine.load_overrides(&ctx.config);
    engine.calculate_all();

    print_section_details(&store, &engine);
    print_standings(&store, &engine);

    if let Some(day) = args.day {
        print_day_standings(&store, &engine, day);
    }

    Ok(())
}

/// One detail block per section, ascending bib
fn print_section_details(store: &SettingsStore, engine: &CalculationEngine<'_>) {
    for section in store.section_order() {
        let rows = engine.section_results(&section);
        if rows.is_empty() {
            continue;
        }

        let display_name = store
            .section(&section)
            .map(|s| s.display_name.clone())
            .unwrap_or_default();
        println!();
        println!("{}  {}", section.bold(), display_name.dimmed());
        println!(
            "{:>5}  {:>12}  {:>13}  {:>6}  {:>6}",
            "bib", "time", "diff", "rank", "point"
        );

        let ranked = ScoringKind::from_section_name(&section).is_ranked();
        for (bib, result) in rows {
            let (time, diff, rank) = detail_cells(result, ranked);
            println!("{:>5}  {:>12}  {:>13}  {:>6}  {:>6}", bib, time, diff, rank, result.point);
        }
    }
}

/// Render the time/diff/rank cells of one result under the status rules
fn detail_cells(result: &SectionResult, ranked: bool) -> (String, String, String) {
    match result.status {
        Some(status) if status.bypasses_timing() => {
            let code = status.to_string();
            (code.clone(), code.clone(), code)
        }
        Some(Status::NotClassified) => (
            format_time(result.passage_time),
            format_diff(result.diff),
            Status::NotClassified.to_string(),
        ),
        _ => (
            format_time(result.passage_time),
            format_diff(result.diff),
            match (ranked, result.rank) {
                (true, Some(rank)) => rank.to_string(),
                _ => "-".to_string(),
            },
        ),
    }
}

/// Overall standings: ranked field first, final-status bibs after it
fn print_standings(store: &SettingsStore, engine: &CalculationEngine<'_>) {
    let mut ranked = Vec::new();
    let mut overridden = Vec::new();

    for &bib in engine.bib_universe() {
        let driver = store
            .competitor(bib)
            .map(|c| c.driver_name.clone())
            .unwrap_or_default();
        let row = (bib, driver, engine.pure_score(bib), engine.total_score(bib));
        match engine.final_status(bib) {
            Some(status) => overridden.push((row, status)),
            None => ranked.push(row),
        }
    }
    ranked.sort_by(|a, b| b.3.cmp(&a.3).then(a.0.cmp(&b.0)));

    println!();
    println!("{}", "Overall standings".bold());
    println!(
        "{:>5}  {:>5}  {:<20}  {:>7}  {:>7}",
        "rank", "bib", "driver", "point", "total"
    );
    for (position, (bib, driver, pure, total)) in ranked.iter().enumerate() {
        println!(
            "{:>5}  {:>5}  {:<20}  {:>7}  {:>7}",
            position + 1,
            bib,
            driver,
            pure,
            total
        );
    }
    for ((bib, driver, pure, total), status) in &overridden {
        println!(
            "{:>5}  {:>5}  {:<20}  {:>7}  {:>7}",
            status.to_string().yellow(),
            bib,
            driver,
            pure,
            total
        );
    }
}

/// Day-scoped leaderboard over the day's sections only
fn print_day_standings(store: &SettingsStore, engine: &CalculationEngine<'_>, day: u32) {
    let sections = store.sections_for_day(day).to_vec();
    if sections.is_empty() {
        println!();
        println!("{}", format!("No sections assigned to day {}", day).yellow());
        return;
    }

    let mut rows: Vec<(u32, i64)> = engine
        .bib_universe()
        .iter()
        .filter(|bib| engine.final_status(**bib).is_none())
        .map(|&bib| (bib, engine.score_for_sections(bib, &sections)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!();
    println!("{}", format!("Day {} standings", day).bold());
    println!("{:>5}  {:>5}  {:>7}", "rank", "bib", "total");
    for (position, (bib, total)) in rows.iter().enumerate() {
        println!("{:>5}  {:>5}  {:>7}", position + 1, bib, total);
    }
}
