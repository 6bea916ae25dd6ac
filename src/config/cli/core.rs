//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Entropia: bloom lineage and entropy-volatility analytics
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "entropia")]
#[command(version)]
#[command(
    about = "Bloom lineage tracking and entropy-volatility analytics with chaos-risk scoring"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate an engine configuration file
    Validate(ValidateArgs),

    /// Replay a JSON-lines event stream into an engine snapshot
    Ingest(IngestArgs),

    /// Show the stability report of one bloom
    Report(ReportArgs),

    /// List blooms whose latest entropy is at or above a threshold
    Hot(HotArgs),

    /// List blooms recommended for stabilization
    Stabilize(StabilizeArgs),

    /// Show the genealogy of one bloom
    Lineage(LineageArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Print the effective configuration after validation
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the ingest command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct IngestArgs {
    /// JSON-lines file of rebloom and sample records
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,

    /// Where to write the resulting engine snapshot
    #[arg(short, long)]
    pub output: PathBuf,

    /// Optional YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the report command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ReportArgs {
    /// Engine snapshot produced by `ingest`
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Bloom id
    #[arg(value_name = "BLOOM")]
    pub bloom: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the hot command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct HotArgs {
    /// Engine snapshot produced by `ingest`
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Minimum latest entropy
    #[arg(short, long, default_value = "0.7")]
    pub threshold: f64,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the stabilize command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct StabilizeArgs {
    /// Engine snapshot produced by `ingest`
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the lineage command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct LineageArgs {
    /// Engine snapshot produced by `ingest`
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Bloom id
    #[arg(value_name = "BLOOM")]
    pub bloom: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse CLI arguments from an iterator
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
