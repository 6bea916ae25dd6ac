//! Derivation forest with depth and drift bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use super::node::{BloomNode, RebloomEvent, RebloomRejection};

/// Running aggregates over every accepted rebloom
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageTotals {
    pub total_reblooms: usize,
    pub max_depth_observed: usize,
    /// Smallest entropy difference seen, `None` before the first rebloom
    pub min_entropy_diff: Option<f64>,
    /// Largest entropy difference seen, `None` before the first rebloom
    pub max_entropy_diff: Option<f64>,
    pub mean_entropy_diff: f64,
}

impl LineageTotals {
    fn record(&mut self, entropy_diff: f64, depth: usize) {
        self.total_reblooms += 1;
        self.max_depth_observed = self.max_depth_observed.max(depth);
        self.min_entropy_diff =
            Some(self.min_entropy_diff.map_or(entropy_diff, |m| m.min(entropy_diff)));
        self.max_entropy_diff =
            Some(self.max_entropy_diff.map_or(entropy_diff, |m| m.max(entropy_diff)));
        self.mean_entropy_diff +=
            (entropy_diff - self.mean_entropy_diff) / self.total_reblooms as f64;
    }
}

/// Bloom derivation forest
///
/// Every bloom has at most one parent. Nodes are keyed by id and linked by a
/// parent pointer plus an ordered child list; the event log is the
/// chronological history and is enough to rebuild the forest by replay.
#[derive(Debug, Clone, Default)]
pub struct LineageTracker {
    nodes: HashMap<String, BloomNode>,
    events: Vec<RebloomEvent>,
    totals: LineageTotals,
}

impl LineageTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a derivation, returning `false` if it was rejected
    pub fn log_rebloom(
        &mut self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
        metadata: Option<HashMap<String, String>>,
    ) -> bool {
        self.try_log_rebloom(parent_id, child_id, entropy_diff, metadata).is_ok()
    }

    /// Record a derivation, reporting why it was rejected
    pub fn try_log_rebloom(
        &mut self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<(), RebloomRejection> {
        let metadata = metadata.unwrap_or_default();
        self.log_rebloom_at(parent_id, child_id, entropy_diff, metadata, Utc::now())
    }

    pub(crate) fn log_rebloom_at(
        &mut self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
        metadata: HashMap<String, String>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), RebloomRejection> {
        if let Err(rejection) = self.check_rebloom(parent_id, child_id, entropy_diff) {
            tracing::debug!(parent = parent_id, child = child_id, %rejection, "rebloom rejected");
            return Err(rejection);
        }

        let parent = self
            .nodes
            .entry(parent_id.to_string())
            .or_insert_with(|| BloomNode::root(parent_id, timestamp));
        parent.children.push(child_id.to_string());
        let (parent_depth, parent_drift) = (parent.depth, parent.total_entropy_drift);

        let child = self
            .nodes
            .entry(child_id.to_string())
            .or_insert_with(|| BloomNode::root(child_id, timestamp));
        child.parent_id = Some(parent_id.to_string());
        child.depth = parent_depth + 1;
        child.entropy_delta_from_parent = entropy_diff;
        child.total_entropy_drift = parent_drift + entropy_diff;
        let grafted_subtree = !child.children.is_empty();

        // A former root brings its descendants along; shift them too
        let deepest = if grafted_subtree {
            self.propagate_from(child_id)
        } else {
            parent_depth + 1
        };

        self.events.push(RebloomEvent {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
            entropy_diff,
            timestamp,
            metadata,
        });
        self.totals.record(entropy_diff, deepest);

        tracing::debug!(
            parent = parent_id,
            child = child_id,
            entropy_diff,
            depth = parent_depth + 1,
            "rebloom recorded"
        );
        Ok(())
    }

    fn check_rebloom(
        &self,
        parent_id: &str,
        child_id: &str,
        entropy_diff: f64,
    ) -> Result<(), RebloomRejection> {
        if parent_id == child_id {
            return Err(RebloomRejection::SelfParent);
        }
        if let Some(existing) = self.nodes.get(child_id).and_then(|n| n.parent_id.as_ref()) {
            return Err(RebloomRejection::AlreadyParented { existing_parent: existing.clone() });
        }
        if !entropy_diff.is_finite() {
            return Err(RebloomRejection::NonFiniteDelta(entropy_diff));
        }
        if self.nodes.contains_key(child_id) && self.get_ancestors(parent_id).any(|a| a == child_id)
        {
            return Err(RebloomRejection::WouldCycle);
        }
        Ok(())
    }

    /// Recompute depth and drift below `id`, returning the deepest depth reached
    fn propagate_from(&mut self, id: &str) -> usize {
        let mut deepest = 0;
        let mut queue = VecDeque::from([id.to_string()]);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            let (depth, drift) = (node.depth, node.total_entropy_drift);
            let children = node.children.clone();
            deepest = deepest.max(depth);

            for child_id in children {
                if let Some(child) = self.nodes.get_mut(&child_id) {
                    child.depth = depth + 1;
                    child.total_entropy_drift = drift + child.entropy_delta_from_parent;
                }
                queue.push_back(child_id);
            }
        }

        deepest
    }

    /// Depth of a bloom, `-1` if it has never been seen
    pub fn get_depth(&self, bloom_id: &str) -> i64 {
        self.nodes.get(bloom_id).map_or(-1, |n| n.depth as i64)
    }

    /// Ancestors from the immediate parent up to the root
    ///
    /// Empty for roots and unknown ids. The iterator is `Clone`, so a walk can
    /// be restarted from any point.
    pub fn get_ancestors<'a>(&'a self, bloom_id: &str) -> Ancestors<'a> {
        Ancestors {
            tracker: self,
            next: self.nodes.get(bloom_id).and_then(|n| n.parent_id.as_deref()),
        }
    }

    /// All descendants in breadth-first order, excluding `bloom_id` itself
    pub fn get_descendants(&self, bloom_id: &str) -> Vec<String> {
        self.descendants_within(bloom_id, usize::MAX)
    }

    /// Descendants at most `max_depth` generations below `bloom_id`
    pub fn descendants_within(&self, bloom_id: &str, max_depth: usize) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(bloom_id, 0usize)]);

        while let Some((current, generation)) = queue.pop_front() {
            if generation >= max_depth {
                continue;
            }
            for child in self.children(current) {
                if seen.insert(child.as_str()) {
                    found.push(child.clone());
                    queue.push_back((child.as_str(), generation + 1));
                }
            }
        }

        found
    }

    /// Node by id
    pub fn node(&self, bloom_id: &str) -> Option<&BloomNode> {
        self.nodes.get(bloom_id)
    }

    /// Whether the bloom has been seen
    pub fn contains(&self, bloom_id: &str) -> bool {
        self.nodes.contains_key(bloom_id)
    }

    /// Number of blooms seen
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no bloom has been seen
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &BloomNode> {
        self.nodes.values()
    }

    /// Event log in acceptance order
    pub fn events(&self) -> &[RebloomEvent] {
        &self.events
    }

    /// Running aggregates
    pub fn totals(&self) -> &LineageTotals {
        &self.totals
    }

    /// Parent of a bloom
    pub fn parent(&self, bloom_id: &str) -> Option<&str> {
        self.nodes.get(bloom_id).and_then(|n| n.parent_id.as_deref())
    }

    /// Children in discovery order
    pub fn children(&self, bloom_id: &str) -> &[String] {
        self.nodes.get(bloom_id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Root ids, sorted
    pub fn roots(&self) -> Vec<String> {
        let mut roots: Vec<String> =
            self.nodes.values().filter(|n| n.is_root()).map(|n| n.id.clone()).collect();
        roots.sort();
        roots
    }

    /// Other children of the same parent; empty for roots
    pub fn siblings(&self, bloom_id: &str) -> Vec<String> {
        self.parent(bloom_id)
            .map(|p| self.children(p).iter().filter(|c| *c != bloom_id).cloned().collect())
            .unwrap_or_default()
    }

    /// Path from the root down to `bloom_id`, inclusive; empty for unknown ids
    pub fn ancestry_chain(&self, bloom_id: &str) -> Vec<String> {
        if !self.contains(bloom_id) {
            return Vec::new();
        }
        let mut chain: Vec<String> = std::iter::once(bloom_id)
            .chain(self.get_ancestors(bloom_id))
            .map(str::to_string)
            .collect();
        chain.reverse();
        chain
    }

    /// `(id, total_entropy_drift)` along the ancestry chain
    pub fn entropy_evolution(&self, bloom_id: &str) -> Vec<(String, f64)> {
        self.ancestry_chain(bloom_id)
            .into_iter()
            .filter_map(|id| {
                let drift = self.nodes.get(&id)?.total_entropy_drift;
                Some((id, drift))
            })
            .collect()
    }

    /// Deepest bloom that is an ancestor of both (each bloom counts as its own ancestor)
    pub fn common_ancestor(&self, a: &str, b: &str) -> Option<String> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let lineage_a: HashSet<&str> =
            std::iter::once(a).chain(self.get_ancestors(a)).collect();
        std::iter::once(b)
            .chain(self.get_ancestors(b))
            .find(|id| lineage_a.contains(id))
            .map(str::to_string)
    }

    /// Blooms at exactly `depth`, sorted
    pub fn blooms_at_depth(&self, depth: usize) -> Vec<String> {
        let mut ids: Vec<String> =
            self.nodes.values().filter(|n| n.depth == depth).map(|n| n.id.clone()).collect();
        ids.sort();
        ids
    }
}

/// Walk up the parent chain
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tracker: &'a LineageTracker,
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tracker.parent(current);
        Some(current)
    }
}
