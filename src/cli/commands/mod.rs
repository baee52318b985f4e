//! CLI command implementations

pub mod check;
pub mod score;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch the parsed arguments to their command implementation
pub fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Commands::Score(score_args) => score::run_score(score_args),
        Commands::Check(check_args) => check::run_check(check_args),
    }
}
