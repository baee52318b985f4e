use clap::Parser;
use rally_scorer::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Rally Scorer - Multi-Stage Rally Timing and Scoring");
    println!("===================================================");
    println!();
    println!("Score timed multi-stage regularity rally events from checkpoint");
    println!("timestamp CSV files and validate the integrity of the raw data.");
    println!();
    println!("USAGE:");
    println!("    rally-scorer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    score       Calculate results and print standings (main command)");
    println!("    check       Run the data-integrity checks and report findings");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Score with the configured folders:");
    println!("    rally-scorer score");
    println!();
    println!("    # Score explicit folders and print a day leaderboard:");
    println!("    rally-scorer score --settings sample/setting --race sample/race --day 1");
    println!();
    println!("    # Validate the raw data and acknowledge a known finding:");
    println!("    rally-scorer check --confirm section_order:1:PC1");
    println!();
    println!("For detailed help on any command, use:");
    println!("    rally-scorer <COMMAND> --help");
}
