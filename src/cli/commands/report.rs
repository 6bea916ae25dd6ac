//! Report command implementation

use crate::cli::LogLevel;
use crate::config::{OutputFormat, ReportArgs};
use crate::entropy::StabilityReport;

use super::{open_snapshot, to_json};

/// Render a stability report as aligned text
pub fn format_report(report: &StabilityReport) -> String {
    let profile = &report.profile;
    let mut lines = vec![
        format!("Bloom: {}", report.bloom_id),
        format!("  Stability:   {}", report.stability_assessment),
        format!("  Thermal:     {}", report.thermal_state),
        format!(
            "  Chaos score: {}",
            report.chaos_score.map_or_else(|| "n/a".to_string(), |c| format!("{c:.4}"))
        ),
        format!("  Samples:     {}", profile.sample_count),
        format!("  Mean:        {:.4}", profile.mean),
        format!("  Std dev:     {:.4}", profile.std_dev),
        format!("  Range:       {:.4} .. {:.4}", profile.min, profile.max),
        format!("  Trend:       {}", profile.trend),
        format!("  Volatility:  {:.4}", profile.volatility_score),
    ];

    if !report.risk_factors.is_empty() {
        let risks: Vec<String> = report.risk_factors.iter().map(ToString::to_string).collect();
        lines.push(format!("  Risks:       {}", risks.join(", ")));
    }
    if !report.recommendations.is_empty() {
        lines.push("  Recommendations:".to_string());
        lines.extend(report.recommendations.iter().map(|r| format!("    - {r}")));
    }

    lines.join("\n")
}

pub fn run_report(args: ReportArgs, _level: LogLevel) -> Result<(), String> {
    let engine = open_snapshot(&args.snapshot)?;
    let report = engine
        .entropy()
        .get_stability_report(&args.bloom)
        .map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Text => println!("{}", format_report(&report)),
    }
    Ok(())
}
