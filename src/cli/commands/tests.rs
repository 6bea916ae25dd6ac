//! CLI command tests
//!
//! Drive each command end to end through temp files.

use super::*;
use crate::cli::LogLevel;
use crate::config::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small config file for testing
fn create_test_config(dir: &TempDir) -> PathBuf {
    let config_path = dir.path().join("entropia.yaml");
    let config = r"
analyzer:
  max_samples_per_bloom: 200
  volatility_window: 10
  chaos_threshold: 0.6
lineage:
  pattern_window: 5
";
    std::fs::write(&config_path, config).unwrap();
    config_path
}

/// Write an event stream with a small family and one oscillating bloom
fn create_test_events(dir: &TempDir) -> PathBuf {
    let events_path = dir.path().join("events.jsonl");
    let mut lines = vec![
        r#"{"kind":"rebloom","parent_id":"root","child_id":"a","entropy_diff":0.1}"#.to_string(),
        r#"{"kind":"rebloom","parent_id":"root","child_id":"b","entropy_diff":-0.1}"#.to_string(),
        r#"{"kind":"rebloom","parent_id":"a","child_id":"a1","entropy_diff":0.2}"#.to_string(),
    ];
    for i in 0..40 {
        let entropy = if i % 10 < 5 { 0.2 } else { 0.9 };
        lines.push(format!(r#"{{"kind":"sample","bloom_id":"a","entropy":{entropy}}}"#));
        lines.push(r#"{"kind":"sample","bloom_id":"b","entropy":0.8}"#.to_string());
    }
    lines.push("garbage".to_string());
    std::fs::write(&events_path, lines.join("\n")).unwrap();
    events_path
}

fn ingest_fixture(dir: &TempDir) -> PathBuf {
    let snapshot = dir.path().join("engine.json");
    let args = IngestArgs {
        events: create_test_events(dir),
        output: snapshot.clone(),
        config: Some(create_test_config(dir)),
    };
    ingest::run_ingest(args, LogLevel::Quiet).unwrap();
    snapshot
}

#[test]
fn test_validate_command_basic() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs { config: create_test_config(&dir), detailed: false };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_detailed() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs { config: create_test_config(&dir), detailed: true };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_missing_file() {
    let args = ValidateArgs { config: PathBuf::from("/nonexistent/config.yaml"), detailed: false };
    let err = validate::run_validate(args, LogLevel::Quiet).unwrap_err();
    assert!(err.contains("Config error"));
}

#[test]
fn test_validate_command_out_of_range() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.yaml");
    std::fs::write(&config_path, "analyzer:\n  volatility_window: 1\n").unwrap();

    let args = ValidateArgs { config: config_path, detailed: false };
    let err = validate::run_validate(args, LogLevel::Quiet).unwrap_err();
    assert!(err.contains("volatility_window"));
}

#[test]
fn test_ingest_writes_loadable_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    let engine = open_snapshot(&snapshot).unwrap();
    assert_eq!(engine.lineage().len(), 4);
    assert_eq!(engine.entropy().sample_count("a"), 40);
    assert_eq!(engine.config().analyzer.max_samples_per_bloom, 200);
    assert_eq!(engine.config().lineage.pattern_window, 5);
}

#[test]
fn test_ingest_missing_events_file() {
    let dir = TempDir::new().unwrap();
    let args = IngestArgs {
        events: dir.path().join("absent.jsonl"),
        output: dir.path().join("out.json"),
        config: None,
    };
    assert!(ingest::run_ingest(args, LogLevel::Quiet).is_err());
}

#[test]
fn test_report_command() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    for format in [OutputFormat::Text, OutputFormat::Json] {
        let args = ReportArgs { snapshot: snapshot.clone(), bloom: "a".to_string(), format };
        assert!(report::run_report(args, LogLevel::Quiet).is_ok());
    }
}

#[test]
fn test_report_unknown_bloom() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    let args = ReportArgs { snapshot, bloom: "ghost".to_string(), format: OutputFormat::Text };
    let err = report::run_report(args, LogLevel::Quiet).unwrap_err();
    assert!(err.contains("ghost"));
}

#[test]
fn test_hot_command() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    let args = HotArgs { snapshot, threshold: 0.7, format: OutputFormat::Json };
    assert!(hot::run_hot(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_stabilize_command() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    let args = StabilizeArgs { snapshot, format: OutputFormat::Text };
    assert!(stabilize::run_stabilize(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_lineage_command() {
    let dir = TempDir::new().unwrap();
    let snapshot = ingest_fixture(&dir);

    let args = LineageArgs { snapshot, bloom: "a1".to_string(), format: OutputFormat::Text };
    assert!(lineage::run_lineage(args, LogLevel::Verbose).is_ok());
}

#[test]
fn test_read_commands_reject_missing_snapshot() {
    let args = HotArgs {
        snapshot: PathBuf::from("/nonexistent/engine.json"),
        threshold: 0.7,
        format: OutputFormat::Text,
    };
    let err = hot::run_hot(args, LogLevel::Quiet).unwrap_err();
    assert!(err.contains("Failed to load snapshot"));
}

#[test]
fn test_run_command_dispatch() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let cli = parse_args(["entropia", "--quiet", "validate", config.to_str().unwrap()]).unwrap();
    assert!(run_command(cli).is_ok());
}

#[test]
fn test_format_hot_blooms() {
    let text = hot::format_hot_blooms(&[("b".to_string(), 0.8), ("c".to_string(), 0.75)]);
    assert!(text.contains("0.8000"));
    assert!(text.contains("2 hot bloom(s)"));
}

#[test]
fn test_format_candidates() {
    let candidates = vec![stabilize::StabilizationCandidate {
        bloom_id: "a".to_string(),
        chaos_score: 0.85,
        risk_level: crate::entropy::RiskLevel::High,
    }];
    let text = stabilize::format_candidates(&candidates);
    assert!(text.contains("0.8500"));
    assert!(text.contains("HIGH"));
}
