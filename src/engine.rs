//! Combined lineage and entropy engine
//!
//! [`BloomEngine`] owns one [`LineageTracker`] and one [`EntropyAnalyzer`]
//! and offers the joined genealogy view plus a single snapshot of both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::config::{validate_config, EngineConfig};
use crate::entropy::{EntropyAnalyzer, EntropyProfile, EntropySnapshot, InsufficientData};
use crate::error::{Error, Result};
use crate::lineage::{BloomNode, LineageSnapshot, LineageTracker, RebloomPatterns, RebloomRejection};
use crate::storage::SnapshotStore;

/// Store key under which engine snapshots are kept
pub const SNAPSHOT_KEY: &str = "engine";

/// Everything known about one bloom's family and entropy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genealogy {
    pub bloom_id: String,
    /// `-1` when the bloom has entropy samples but no lineage
    pub depth: i64,
    pub node: Option<BloomNode>,
    /// Root first, ending at the bloom
    pub ancestry_chain: Vec<String>,
    pub descendants: Vec<String>,
    pub siblings: Vec<String>,
    /// `(bloom, total drift)` along the ancestry chain
    pub entropy_evolution: Vec<(String, f64)>,
    pub profile: Option<EntropyProfile>,
}

/// Serializable state of a whole engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    #[serde(default)]
    pub config: EngineConfig,
    pub lineage: LineageSnapshot,
    pub entropy: EntropySnapshot,
    pub saved_at: DateTime<Utc>,
}

impl EngineSnapshot {
    /// Effective config of the restored engine; analyzer settings come from
    /// the entropy log
    pub fn effective_config(&self) -> EngineConfig {
        let mut config = self.config.clone();
        config.analyzer = self.entropy.config.clone();
        config
    }

    /// Reject snapshots whose settings fail the config rules
    pub fn validate(&self) -> Result<()> {
        validate_config(&self.effective_config())?;
        Ok(())
    }
}

/// Lineage tracker and entropy analyzer behind one `&self` API
#[derive(Debug)]
pub struct BloomEngine {
    config: EngineConfig,
    lineage: RwLock<LineageTracker>,
    entropy: EntropyAnalyzer,
}

impl Default for BloomEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BloomEngine {
    /// Create an engine; the config is assumed validated
    pub fn new(config: EngineConfig) -> Self {
        let entropy = EntropyAnalyzer::new(config.analyzer.clone());
        Self { config, lineage: RwLock::new(LineageTracker::new()), entropy }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Record a derivation, returning `false` if it was rejected
    pub fn log_rebloom(
        &self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
        metadata: Option<HashMap<String, String>>,
    ) -> bool {
        self.try_log_rebloom(parent_id, child_id, entropy_diff, metadata).is_ok()
    }

    pub fn try_log_rebloom(
        &self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
        metadata: Option<HashMap<String, String>>,
    ) -> std::result::Result<(), RebloomRejection> {
        self.lineage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .try_log_rebloom(parent_id, child_id, entropy_diff, metadata)
    }

    /// Record an entropy reading
    pub fn add_entropy_sample(&self, bloom_id: &str, entropy: f64) -> EntropyProfile {
        self.entropy.add_entropy_sample(bloom_id, entropy)
    }

    /// Record an entropy reading from a named source
    pub fn add_entropy_sample_from(
        &self,
        bloom_id: &str,
        entropy: f64,
        source: &str,
    ) -> EntropyProfile {
        self.entropy.add_entropy_sample_from(bloom_id, entropy, source)
    }

    /// Read access to the lineage forest
    ///
    /// Writers wait while the guard is held.
    pub fn lineage(&self) -> RwLockReadGuard<'_, LineageTracker> {
        self.lineage.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entropy(&self) -> &EntropyAnalyzer {
        &self.entropy
    }

    /// Rebloom patterns over the configured window
    pub fn rebloom_patterns(&self) -> RebloomPatterns {
        self.lineage().rebloom_patterns(self.config.lineage.pattern_window)
    }

    /// Joined lineage and entropy view of one bloom
    ///
    /// Fails only when the bloom appears in neither the forest nor the analyzer.
    pub fn genealogy(&self, bloom_id: &str) -> std::result::Result<Genealogy, InsufficientData> {
        let profile = self.entropy.profile(bloom_id);
        let lineage = self.lineage();
        let node = lineage.node(bloom_id).cloned();
        if node.is_none() && profile.is_none() {
            return Err(InsufficientData::no_data(bloom_id));
        }

        Ok(Genealogy {
            bloom_id: bloom_id.to_string(),
            depth: lineage.get_depth(bloom_id),
            ancestry_chain: lineage.ancestry_chain(bloom_id),
            descendants: lineage.get_descendants(bloom_id),
            siblings: lineage.siblings(bloom_id),
            entropy_evolution: lineage.entropy_evolution(bloom_id),
            node,
            profile,
        })
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config: self.config.clone(),
            lineage: self.lineage().save_snapshot(),
            entropy: self.entropy.save_snapshot(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild an engine by replaying both logs
    pub fn from_snapshot(snapshot: &EngineSnapshot) -> Self {
        Self {
            config: snapshot.effective_config(),
            lineage: RwLock::new(LineageTracker::from_snapshot(&snapshot.lineage)),
            entropy: EntropyAnalyzer::from_snapshot(&snapshot.entropy),
        }
    }

    /// Write the engine snapshot as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)
            .map_err(|e| Error::io(format!("Failed to write engine snapshot {}", path.display()), e))?;
        tracing::info!(
            path = %path.display(),
            reblooms = snapshot.lineage.events.len(),
            blooms_sampled = snapshot.entropy.samples.len(),
            "engine snapshot saved"
        );
        Ok(())
    }

    /// Read an engine snapshot file and replay it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read engine snapshot {}", path.display()), e))?;
        let snapshot: EngineSnapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;
        tracing::info!(path = %path.display(), "engine snapshot loaded");
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Store the snapshot under [`SNAPSHOT_KEY`] and flush the store
    pub fn save_to<S: SnapshotStore>(&self, store: &mut S) -> Result<()> {
        store.save(SNAPSHOT_KEY, &self.snapshot())?;
        store.flush()?;
        Ok(())
    }

    /// Rebuild from the snapshot stored under [`SNAPSHOT_KEY`]
    pub fn load_from<S: SnapshotStore>(store: &S) -> Result<Self> {
        let snapshot: EngineSnapshot = store.load(SNAPSHOT_KEY)?;
        snapshot.validate()?;
        Ok(Self::from_snapshot(&snapshot))
    }
}
