//! Command-line argument definitions for the rally scorer
//!
//! This module defines the CLI interface using the clap derive API. Both
//! commands share the configuration/folder flags; folder flags override
//! whatever the persisted configuration names.

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the rally scorer
///
/// Scores timed multi-stage regularity rally events from checkpoint
/// timestamp CSV files and validates the integrity of the raw data.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rally-scorer",
    version,
    about = "Score timed multi-stage rally events from checkpoint timestamp files",
    long_about = "Loads the roster, points and section tables from a settings folder, \
                  parses the race folder's checkpoint timestamp files, computes per-section \
                  differentials, ranks and points, aggregates coefficient-weighted totals, \
                  and checks the raw data for cross-section inconsistencies."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Calculate results and print per-section details and standings
    Score(ScoreArgs),
    /// Run the data-integrity checks and report findings
    Check(CheckArgs),
}

/// Arguments for the score command
#[derive(Debug, Clone, Parser)]
pub struct ScoreArgs {
    /// Path to the persisted configuration file
    ///
    /// Holds the folder locations, the CO bonus value and the manual
    /// status overrides. A missing file means defaults.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Path to the persisted configuration file (JSON)"
    )]
    pub config_file: PathBuf,

    /// Settings folder holding the entries/point/section tables
    #[arg(
        short = 's',
        long = "settings",
        value_name = "PATH",
        help = "Settings folder (overrides the configured one)"
    )]
    pub settings_dir: Option<PathBuf>,

    /// Race folder holding the timing CSV files
    #[arg(
        short = 'r',
        long = "race",
        value_name = "PATH",
        help = "Race folder (overrides the configured one)"
    )]
    pub race_dir: Option<PathBuf>,

    /// Also print a standings table restricted to one day's sections
    #[arg(long = "day", value_name = "N", help = "Print a day-scoped leaderboard")]
    pub day: Option<u32>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress logging except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Path to the persisted configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Path to the persisted configuration file (JSON)"
    )]
    pub config_file: PathBuf,

    /// Settings folder holding the entries/point/section tables
    #[arg(
        short = 's',
        long = "settings",
        value_name = "PATH",
        help = "Settings folder (overrides the configured one)"
    )]
    pub settings_dir: Option<PathBuf>,

    /// Race folder holding the timing CSV files
    #[arg(
        short = 'r',
        long = "race",
        value_name = "PATH",
        help = "Race folder (overrides the configured one)"
    )]
    pub race_dir: Option<PathBuf>,

    /// Mark finding keys as acknowledged and persist them
    #[arg(
        long = "confirm",
        value_name = "KEY",
        help = "Mark a finding key as acknowledged (repeatable)"
    )]
    pub confirm: Vec<String>,

    /// Withdraw acknowledgements for finding keys
    #[arg(
        long = "unconfirm",
        value_name = "KEY",
        help = "Withdraw an acknowledgement for a finding key (repeatable)"
    )]
    pub unconfirm: Vec<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress logging except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

fn validate_dir(flag: &str, dir: Option<&PathBuf>) -> Result<()> {
    if let Some(dir) = dir {
        if !dir.exists() {
            return Err(Error::configuration(format!(
                "{} path does not exist: {}",
                flag,
                dir.display()
            )));
        }
        if !dir.is_dir() {
            return Err(Error::configuration(format!(
                "{} path is not a directory: {}",
                flag,
                dir.display()
            )));
        }
    }
    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl ScoreArgs {
    /// Validate the score command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_dir("Settings", self.settings_dir.as_ref())?;
        validate_dir("Race", self.race_dir.as_ref())?;
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl CheckArgs {
    /// Validate the check command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_dir("Settings", self.settings_dir.as_ref())?;
        validate_dir("Race", self.race_dir.as_ref())?;
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}
