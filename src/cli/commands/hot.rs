//! Hot command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{HotArgs, OutputFormat};

use super::{open_snapshot, to_json};

/// Render `(bloom, latest entropy)` rows
pub fn format_hot_blooms(hot: &[(String, f64)]) -> String {
    let mut lines = vec![format!("{:<32} {:>8}", "BLOOM", "ENTROPY"), "-".repeat(41)];
    lines.extend(hot.iter().map(|(id, entropy)| format!("{id:<32} {entropy:>8.4}")));
    lines.push(format!("\n{} hot bloom(s)", hot.len()));
    lines.join("\n")
}

pub fn run_hot(args: HotArgs, level: LogLevel) -> Result<(), String> {
    let engine = open_snapshot(&args.snapshot)?;
    let hot = engine.entropy().get_hot_blooms(args.threshold);

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&hot)?),
        OutputFormat::Text if hot.is_empty() => log(
            level,
            LogLevel::Normal,
            &format!("No blooms at or above {}", args.threshold),
        ),
        OutputFormat::Text => println!("{}", format_hot_blooms(&hot)),
    }
    Ok(())
}
