//! Forest nodes, derivation events, and rejection reasons

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bloom in the derivation forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomNode {
    /// Bloom identifier
    pub id: String,
    /// Registered parent, `None` for roots
    pub parent_id: Option<String>,
    /// Child ids in discovery order
    pub children: Vec<String>,
    /// Distance from the root (0 for roots)
    pub depth: usize,
    /// Entropy change recorded when this bloom was derived
    pub entropy_delta_from_parent: f64,
    /// Cumulative entropy change from the root
    pub total_entropy_drift: f64,
    /// First time this bloom was observed
    pub creation_time: DateTime<Utc>,
}

impl BloomNode {
    /// A parentless node first seen at `creation_time`
    pub fn root(id: impl Into<String>, creation_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            children: Vec::new(),
            depth: 0,
            entropy_delta_from_parent: 0.0,
            total_entropy_drift: 0.0,
            creation_time,
        }
    }

    /// Whether this bloom has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Append-only record of one accepted derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebloomEvent {
    pub parent_id: String,
    pub child_id: String,
    pub entropy_diff: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RebloomEvent {
    /// The `source` metadata tag, or `"unknown"`
    pub fn source(&self) -> &str {
        self.metadata.get("source").map_or("unknown", String::as_str)
    }
}

/// Why a derivation request was refused
///
/// Rejections are routine (duplicate or late producer events) and leave the
/// tracker untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RebloomRejection {
    #[error("a bloom cannot be its own parent")]
    SelfParent,

    #[error("bloom already has parent {existing_parent}")]
    AlreadyParented { existing_parent: String },

    #[error("child is an ancestor of the parent; linking would create a cycle")]
    WouldCycle,

    #[error("entropy difference must be finite, got {0}")]
    NonFiniteDelta(f64),
}
