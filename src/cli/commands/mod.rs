//! CLI command implementations

mod hot;
mod ingest;
mod lineage;
mod report;
mod stabilize;
mod validate;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};
use crate::engine::BloomEngine;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Ingest(args) => ingest::run_ingest(args, log_level),
        Command::Report(args) => report::run_report(args, log_level),
        Command::Hot(args) => hot::run_hot(args, log_level),
        Command::Stabilize(args) => stabilize::run_stabilize(args, log_level),
        Command::Lineage(args) => lineage::run_lineage(args, log_level),
    }
}

/// Restore the engine saved by `ingest`
fn open_snapshot(path: &Path) -> Result<BloomEngine, String> {
    BloomEngine::load_from_file(path).map_err(|e| format!("Failed to load snapshot: {e}"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}
