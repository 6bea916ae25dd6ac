//! Stabilize command implementation

use serde::Serialize;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, StabilizeArgs};
use crate::entropy::RiskLevel;

use super::{open_snapshot, to_json};

/// One bloom recommended for stabilization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilizationCandidate {
    pub bloom_id: String,
    pub chaos_score: f64,
    pub risk_level: RiskLevel,
}

pub fn format_candidates(candidates: &[StabilizationCandidate]) -> String {
    let mut lines = vec![
        format!("{:<32} {:>8} {:>10}", "BLOOM", "CHAOS", "RISK"),
        "-".repeat(52),
    ];
    lines.extend(candidates.iter().map(|c| {
        format!("{:<32} {:>8.4} {:>10}", c.bloom_id, c.chaos_score, c.risk_level.to_string())
    }));
    lines.push(format!("\n{} bloom(s) need stabilization", candidates.len()));
    lines.join("\n")
}

pub fn run_stabilize(args: StabilizeArgs, level: LogLevel) -> Result<(), String> {
    let engine = open_snapshot(&args.snapshot)?;
    let threshold = engine.entropy().config().chaos_threshold;
    let candidates: Vec<StabilizationCandidate> = engine
        .entropy()
        .stabilization_candidates()
        .into_iter()
        .map(|(bloom_id, chaos_score)| StabilizationCandidate {
            bloom_id,
            chaos_score,
            risk_level: RiskLevel::from_score(chaos_score),
        })
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&candidates)?),
        OutputFormat::Text if candidates.is_empty() => log(
            level,
            LogLevel::Normal,
            &format!("No blooms at or above chaos threshold {threshold}"),
        ),
        OutputFormat::Text => println!("{}", format_candidates(&candidates)),
    }
    Ok(())
}
