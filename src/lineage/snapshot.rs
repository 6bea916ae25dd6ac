//! Event-log snapshots of a lineage tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::node::RebloomEvent;
use super::tracker::LineageTracker;
use crate::error::{Error, Result};

/// Serializable lineage state: the full rebloom log
///
/// Replaying the events in order rebuilds the forest, node creation times
/// included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageSnapshot {
    pub events: Vec<RebloomEvent>,
    pub saved_at: DateTime<Utc>,
}

impl LineageTracker {
    /// Capture the event log
    pub fn save_snapshot(&self) -> LineageSnapshot {
        LineageSnapshot { events: self.events().to_vec(), saved_at: Utc::now() }
    }

    /// Rebuild a tracker by replaying a snapshot
    ///
    /// Events that would be rejected against the rebuilt forest are skipped.
    pub fn from_snapshot(snapshot: &LineageSnapshot) -> Self {
        let mut tracker = Self::new();
        for event in &snapshot.events {
            if let Err(rejection) = tracker.log_rebloom_at(
                &event.parent_id,
                &event.child_id,
                event.entropy_diff,
                event.metadata.clone(),
                event.timestamp,
            ) {
                tracing::warn!(
                    parent = %event.parent_id,
                    child = %event.child_id,
                    %rejection,
                    "skipping snapshot event"
                );
            }
        }
        tracker
    }

    /// Write the snapshot as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.save_snapshot())?;
        std::fs::write(path, json)
            .map_err(|e| Error::io(format!("Failed to write lineage snapshot {}", path.display()), e))?;
        tracing::info!(path = %path.display(), events = self.events().len(), "lineage snapshot saved");
        Ok(())
    }

    /// Read a snapshot file and replay it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read lineage snapshot {}", path.display()), e))?;
        let snapshot: LineageSnapshot = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), events = snapshot.events.len(), "lineage snapshot loaded");
        Ok(Self::from_snapshot(&snapshot))
    }
}
