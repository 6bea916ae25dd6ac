//! Ingest command implementation
//!
//! Replays a JSON-lines event stream into a fresh engine and writes its
//! snapshot. Each line is either a rebloom or an entropy sample:
//!
//! ```text
//! {"kind":"rebloom","parent_id":"a","child_id":"b","entropy_diff":0.1}
//! {"kind":"sample","bloom_id":"b","entropy":0.42,"source":"sigil"}
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, EngineConfig, IngestArgs};
use crate::engine::BloomEngine;

/// One line of an event stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IngestRecord {
    Rebloom {
        parent_id: String,
        child_id: String,
        entropy_diff: f64,
        #[serde(default)]
        metadata: Option<HashMap<String, String>>,
    },
    Sample {
        bloom_id: String,
        entropy: f64,
        #[serde(default)]
        source: Option<String>,
    },
}

/// Counts from one ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub reblooms_accepted: usize,
    pub reblooms_rejected: usize,
    pub samples: usize,
    /// Line numbers (1-based) that could not be parsed
    pub skipped_lines: Vec<usize>,
}

impl IngestSummary {
    pub fn format(&self) -> String {
        format!(
            "Reblooms: {} accepted, {} rejected\nSamples: {}\nSkipped lines: {}",
            self.reblooms_accepted,
            self.reblooms_rejected,
            self.samples,
            self.skipped_lines.len()
        )
    }
}

/// Apply every parseable record from `reader` to `engine`
///
/// Blank lines are ignored; malformed ones are counted and skipped.
pub fn ingest_records<R: BufRead>(engine: &BloomEngine, reader: R) -> Result<IngestSummary, String> {
    let mut summary = IngestSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read events: {e}"))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<IngestRecord>(&line) {
            Ok(IngestRecord::Rebloom { parent_id, child_id, entropy_diff, metadata }) => {
                if engine.log_rebloom(&parent_id, &child_id, entropy_diff, metadata) {
                    summary.reblooms_accepted += 1;
                } else {
                    summary.reblooms_rejected += 1;
                }
            }
            Ok(IngestRecord::Sample { bloom_id, entropy, source }) => {
                match source {
                    Some(source) => engine.add_entropy_sample_from(&bloom_id, entropy, &source),
                    None => engine.add_entropy_sample(&bloom_id, entropy),
                };
                summary.samples += 1;
            }
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed event");
                summary.skipped_lines.push(index + 1);
            }
        }
    }

    Ok(summary)
}

pub fn run_ingest(args: IngestArgs, level: LogLevel) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => load_config(path).map_err(|e| format!("Config error: {e}"))?,
        None => EngineConfig::default(),
    };

    log(
        level,
        LogLevel::Normal,
        &format!("Ingesting events: {}", args.events.display()),
    );

    let file = std::fs::File::open(&args.events)
        .map_err(|e| format!("Failed to open {}: {e}", args.events.display()))?;
    let engine = BloomEngine::new(config);
    let summary = ingest_records(&engine, BufReader::new(file))?;

    if !summary.skipped_lines.is_empty() {
        log(
            level,
            LogLevel::Verbose,
            &format!("Skipped lines: {:?}", summary.skipped_lines),
        );
    }

    engine
        .save_to_file(&args.output)
        .map_err(|e| format!("Failed to write snapshot: {e}"))?;

    log(level, LogLevel::Normal, &summary.format());
    log(
        level,
        LogLevel::Normal,
        &format!("Snapshot written: {}", args.output.display()),
    );

    Ok(())
}
