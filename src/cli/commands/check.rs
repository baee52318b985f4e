//! Check command implementation
//!
//! Runs the two-pass validation protocol: first over the raw data alone,
//! then again with the computed result grid so the measurement check can
//! run. Findings the operator has acknowledged earlier stay marked via
//! their comparison keys; non-confirmable findings make the command exit
//! with an error so surrounding tooling can block on them.

use colored::Colorize;
use tracing::info;

use super::shared::{resolve_context, setup_logging};
use crate::app::services::calculation_engine::CalculationEngine;
use crate::app::services::data_validator::{Finding, apply_confirmations, validate_all};
use crate::app::services::settings_store::SettingsStore;
use crate::app::services::timing_parser::TimingParser;
use crate::cli::args::CheckArgs;
use crate::{Error, Result};

pub fn run_check(args: CheckArgs) -> Result<()> {
    setup_logging(args.get_log_level())?;
    args.validate()?;

    let mut ctx = resolve_context(
        &args.config_file,
        args.settings_dir.as_deref(),
        args.race_dir.as_deref(),
    )?;

    // Acknowledgement changes are persisted before validation runs
    if !args.confirm.is_empty() || !args.unconfirm.is_empty() {
        for key in &args.confirm {
            ctx.config.confirm_finding(key.clone());
        }
        for key in &args.unconfirm {
            ctx.config.unconfirm_finding(key);
        }
        ctx.config.save(&args.config_file)?;
        info!(
            "Persisted {} acknowledgement changes",
            args.confirm.len() + args.unconfirm.len()
        );
    }

    let store = SettingsStore::load(&ctx.settings_dir)?;
    let mut parser = TimingParser::new(&ctx.race_dir);
    parser.parse_all()?;

    let statuses = ctx.config.section_status_pairs();

    // Pass 1: structural checks over the raw data alone
    let pass1 = validate_all(
        parser.race_dir(),
        parser.records(),
        store.sections(),
        &statuses,
        None,
    );
    println!(
        "Pass 1 (pre-calculation): {} findings",
        pass1.len()
    );

    // Pass 2: recompute the grid and add the measurement check
    let mut engine = CalculationEngine::with_co_point(&store, &parser, ctx.config.co_point);
    engine.load_overrides(&ctx.config);
    engine.calculate_all();

    let mut findings = validate_all(
        parser.race_dir(),
        parser.records(),
        store.sections(),
        &statuses,
        Some(&engine),
    );
    apply_confirmations(&mut findings, &ctx.config.confirmed_keys());
    println!("Pass 2 (post-calculation): {} findings", findings.len());

    if findings.is_empty() {
        println!();
        println!("{}", "No integrity problems found".green());
        return Ok(());
    }

    println!();
    for finding in &findings {
        let marker = if !finding.confirmable() {
            "BLOCK".red().bold()
        } else if finding.confirmed {
            "ACK".green()
        } else {
            "WARN".yellow()
        };
        println!("[{}] {}", marker, finding.message);
        println!("        key: {}", finding.key().dimmed());
    }

    print_summary(&findings);

    let blocking = findings.iter().filter(|f| !f.confirmable()).count();
    if blocking > 0 {
        return Err(Error::data_integrity(format!(
            "{} findings require fixes in the source data",
            blocking
        )));
    }
    Ok(())
}

fn print_summary(findings: &[Finding]) {
    let blocking = findings.iter().filter(|f| !f.confirmable()).count();
    let acknowledged = findings
        .iter()
        .filter(|f| f.confirmable() && f.confirmed)
        .count();
    let open = findings.len() - blocking - acknowledged;

    println!();
    println!(
        "{} blocking, {} open, {} acknowledged",
        blocking, open, acknowledged
    );
}
