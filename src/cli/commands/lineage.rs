//! Lineage command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LineageArgs, OutputFormat};
use crate::engine::Genealogy;

use super::{open_snapshot, to_json};

fn list_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

/// Render a genealogy as text
pub fn format_genealogy(genealogy: &Genealogy) -> String {
    let mut lines = vec![format!("Bloom: {}", genealogy.bloom_id)];

    match &genealogy.node {
        Some(node) => {
            lines.push(format!("  Depth:       {}", genealogy.depth));
            lines.push(format!("  Ancestry:    {}", genealogy.ancestry_chain.join(" -> ")));
            lines.push(format!("  Children:    {}", list_or_none(&node.children)));
            lines.push(format!("  Descendants: {}", list_or_none(&genealogy.descendants)));
            lines.push(format!("  Siblings:    {}", list_or_none(&genealogy.siblings)));
            lines.push(format!("  Total drift: {:+.4}", node.total_entropy_drift));
        }
        None => lines.push("  Not part of any lineage".to_string()),
    }

    if let Some(profile) = &genealogy.profile {
        lines.push(format!(
            "  Entropy:     mean {:.4}, volatility {:.4}, {} sample(s)",
            profile.mean, profile.volatility_score, profile.sample_count
        ));
    }

    lines.join("\n")
}

pub fn run_lineage(args: LineageArgs, level: LogLevel) -> Result<(), String> {
    let engine = open_snapshot(&args.snapshot)?;
    let genealogy = engine.genealogy(&args.bloom).map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&genealogy)?),
        OutputFormat::Text => {
            println!("{}", format_genealogy(&genealogy));
            if level == LogLevel::Verbose {
                for (id, drift) in &genealogy.entropy_evolution {
                    log(level, LogLevel::Verbose, &format!("    {id}: {drift:+.4}"));
                }
            }
        }
    }
    Ok(())
}
