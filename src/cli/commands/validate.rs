//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, EngineConfig, ValidateArgs};

/// Format analyzer settings as a string
pub fn format_analyzer_info(config: &EngineConfig) -> String {
    let analyzer = &config.analyzer;
    [
        "  Analyzer:".to_string(),
        format!("    Max samples per bloom: {}", analyzer.max_samples_per_bloom),
        format!("    Volatility window: {}", analyzer.volatility_window),
        format!("    Chaos threshold: {}", analyzer.chaos_threshold),
        format!("    Chaos cache TTL: {}s", analyzer.chaos_cache_ttl_secs),
        format!("    Anomaly z-threshold: {}", analyzer.anomaly_z_threshold),
    ]
    .join("\n")
}

/// Format lineage settings as a string
pub fn format_lineage_info(config: &EngineConfig) -> String {
    format!("  Lineage:\n    Pattern window: {}", config.lineage.pattern_window)
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    // load_config validates before returning
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        println!();
        println!("Configuration Summary:");
        println!("{}", format_analyzer_info(&config));
        println!();
        println!("{}", format_lineage_info(&config));
    }

    Ok(())
}
