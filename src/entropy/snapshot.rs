//! Sample-log snapshots of an entropy analyzer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::analyzer::EntropyAnalyzer;
use super::stats::RunningStats;
use super::types::EntropySample;
use crate::config::{validate_config, AnalyzerConfig, EngineConfig};
use crate::error::{Error, Result};

/// Serializable analyzer state
///
/// Profiles, thermal states, and trends are derived data; reloading replays
/// the retained samples in order to recompute them, then restores the
/// global statistics, which cover evicted samples as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropySnapshot {
    pub config: AnalyzerConfig,
    /// Retained samples per bloom, oldest first
    pub samples: BTreeMap<String, Vec<EntropySample>>,
    pub global: RunningStats,
    /// Thermal membership at save time
    pub hot_blooms: Vec<String>,
    pub cooling_blooms: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl EntropySnapshot {
    /// Check the embedded analyzer settings against the config rules
    pub fn validate(&self) -> Result<()> {
        let config = EngineConfig { analyzer: self.config.clone(), ..EngineConfig::default() };
        validate_config(&config)?;
        Ok(())
    }
}

impl EntropyAnalyzer {
    /// Capture every retained sample and the global statistics
    pub fn save_snapshot(&self) -> EntropySnapshot {
        let samples = self
            .bloom_ids()
            .into_iter()
            .map(|id| {
                let samples = self.samples(&id);
                (id, samples)
            })
            .collect();

        EntropySnapshot {
            config: self.config().clone(),
            samples,
            global: self.running_stats(),
            hot_blooms: self.hot_bloom_ids(),
            cooling_blooms: self.cooling_bloom_ids(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild an analyzer from a snapshot
    pub fn from_snapshot(snapshot: &EntropySnapshot) -> Self {
        let analyzer = Self::new(snapshot.config.clone());
        for samples in snapshot.samples.values() {
            for sample in samples {
                analyzer.ingest(sample.clone());
            }
        }
        analyzer.restore_running_stats(snapshot.global);

        let hot = analyzer.hot_bloom_ids();
        if hot != snapshot.hot_blooms {
            tracing::debug!(saved = ?snapshot.hot_blooms, replayed = ?hot, "hot set differs after replay");
        }
        analyzer
    }

    /// Write the snapshot as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.save_snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)
            .map_err(|e| Error::io(format!("Failed to write entropy snapshot {}", path.display()), e))?;
        tracing::info!(
            path = %path.display(),
            blooms = snapshot.samples.len(),
            samples = snapshot.global.count,
            "entropy snapshot saved"
        );
        Ok(())
    }

    /// Read a snapshot file, validate its settings, and replay it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read entropy snapshot {}", path.display()), e))?;
        let snapshot: EntropySnapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;
        tracing::info!(path = %path.display(), blooms = snapshot.samples.len(), "entropy snapshot loaded");
        Ok(Self::from_snapshot(&snapshot))
    }
}
