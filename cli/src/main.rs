#![deny(missing_docs)]

//! # apimerge CLI
//!
//! Command Line Interface for the handler merge engine.
//!
//! Supported Commands:
//! - `merge`: Reads a service description file and merges missing handlers into the project.
//! - `plugin`: Same, with description, directory and style delivered as a JSON payload on stdin.

use crate::error::CliResult;
use apimerge_core::RunReport;
use clap::{Parser, Subcommand};

mod error;
mod merge;
mod plugin;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Idempotent API handler merge tool")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge handlers described by a JSON or YAML service description file.
    Merge(merge::MergeArgs),
    /// Merge handlers from a plugin payload read on stdin.
    Plugin(plugin::PluginArgs),
}

/// Console notice for a handler staged for merging. Printed as the run goes,
/// so handlers written before a later failure are still reported.
pub(crate) fn print_notice(name: &str) {
    println!("merge handler {}", name);
}

/// Prints the summary of a finished run.
pub(crate) fn print_summary(report: &RunReport) {
    let skipped: usize = report.outcomes.iter().map(|o| o.skipped.len()).sum();
    println!(
        "Done: {} handler(s) merged, {} already present, {} file(s) touched.",
        report.merged_handlers().count(),
        skipped,
        report.outcomes.len()
    );
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let report = match &cli.command {
        Commands::Merge(args) => merge::execute(args, print_notice)?,
        Commands::Plugin(args) => plugin::execute(args, std::io::stdin().lock(), print_notice)?,
    };
    print_summary(&report);

    Ok(())
}
