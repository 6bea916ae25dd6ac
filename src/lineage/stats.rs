//! Forest-wide statistics, rebloom patterns, and graph export

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::node::BloomNode;
use super::tracker::LineageTracker;

/// Entropy differences within this band count as stable
const STABLE_DIFF: f64 = 0.01;
/// Entropy differences beyond this magnitude count as high volatility
const HIGH_VOLATILITY_DIFF: f64 = 0.2;

/// Summary of a whole forest or a single family tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageStatistics {
    pub total_blooms: usize,
    pub total_roots: usize,
    pub max_depth: usize,
    pub average_depth: f64,
    /// Number of blooms at each depth
    pub depth_distribution: BTreeMap<usize, usize>,
    pub drift: DriftStatistics,
}

/// Spread of cumulative drift values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftStatistics {
    /// Largest `total_entropy_drift`
    pub max_positive_drift: f64,
    /// Smallest `total_entropy_drift`
    pub max_negative_drift: f64,
    pub average_drift: f64,
}

/// Direction of the mean entropy difference over recent reblooms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl std::fmt::Display for DriftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriftDirection::Increasing => write!(f, "increasing"),
            DriftDirection::Decreasing => write!(f, "decreasing"),
            DriftDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Classification of the most recent rebloom events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebloomPatterns {
    pub events_analyzed: usize,
    pub increasing_entropy: usize,
    pub decreasing_entropy: usize,
    pub stable_entropy: usize,
    /// Events whose |diff| exceeds the high-volatility band (also counted above)
    pub high_volatility: usize,
    pub average_diff: f64,
    pub entropy_trend: DriftDirection,
    /// Event count per `metadata["source"]`
    pub source_distribution: BTreeMap<String, usize>,
}

/// Node of an exported lineage graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub depth: usize,
    pub total_entropy_drift: f64,
    pub children_count: usize,
}

/// Edge of an exported lineage graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub entropy_diff: f64,
}

/// Node/edge view of the forest for external visualization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageGraph {
    /// Sorted by id
    pub nodes: Vec<GraphNode>,
    /// In rebloom order
    pub edges: Vec<GraphEdge>,
    pub max_depth: usize,
}

impl LineageTracker {
    /// Statistics over the whole forest, or over one family tree when `root` is given
    ///
    /// An unknown root yields empty statistics.
    pub fn lineage_statistics(&self, root: Option<&str>) -> LineageStatistics {
        let nodes: Vec<&BloomNode> = match root {
            Some(root_id) => match self.node(root_id) {
                Some(root_node) => std::iter::once(root_node)
                    .chain(self.get_descendants(root_id).into_iter().filter_map(|id| self.node(&id)))
                    .collect(),
                None => Vec::new(),
            },
            None => self.nodes().collect(),
        };
        if nodes.is_empty() {
            return LineageStatistics::default();
        }

        let count = nodes.len() as f64;
        let mut depth_distribution = BTreeMap::new();
        for node in &nodes {
            *depth_distribution.entry(node.depth).or_insert(0) += 1;
        }

        let drifts = nodes.iter().map(|n| n.total_entropy_drift);
        let drift = DriftStatistics {
            max_positive_drift: drifts.clone().fold(f64::NEG_INFINITY, f64::max),
            max_negative_drift: drifts.clone().fold(f64::INFINITY, f64::min),
            average_drift: drifts.sum::<f64>() / count,
        };

        LineageStatistics {
            total_blooms: nodes.len(),
            total_roots: nodes.iter().filter(|n| n.is_root()).count(),
            max_depth: nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            average_depth: nodes.iter().map(|n| n.depth as f64).sum::<f64>() / count,
            depth_distribution,
            drift,
        }
    }

    /// Classify the last `window` rebloom events
    pub fn rebloom_patterns(&self, window: usize) -> RebloomPatterns {
        let start = self.events().len().saturating_sub(window);
        let recent = &self.events()[start..];
        if recent.is_empty() {
            return RebloomPatterns::default();
        }

        let mut patterns = RebloomPatterns { events_analyzed: recent.len(), ..Default::default() };
        for event in recent {
            let diff = event.entropy_diff;
            if diff > STABLE_DIFF {
                patterns.increasing_entropy += 1;
            } else if diff < -STABLE_DIFF {
                patterns.decreasing_entropy += 1;
            } else {
                patterns.stable_entropy += 1;
            }
            if diff.abs() > HIGH_VOLATILITY_DIFF {
                patterns.high_volatility += 1;
            }
            *patterns.source_distribution.entry(event.source().to_string()).or_insert(0) += 1;
        }

        patterns.average_diff =
            recent.iter().map(|e| e.entropy_diff).sum::<f64>() / recent.len() as f64;
        patterns.entropy_trend = if patterns.average_diff > STABLE_DIFF {
            DriftDirection::Increasing
        } else if patterns.average_diff < -STABLE_DIFF {
            DriftDirection::Decreasing
        } else {
            DriftDirection::Stable
        };

        patterns
    }

    /// Export nodes and edges for visualization
    pub fn export_graph(&self) -> LineageGraph {
        let mut nodes: Vec<GraphNode> = self
            .nodes()
            .map(|n| GraphNode {
                id: n.id.clone(),
                depth: n.depth,
                total_entropy_drift: n.total_entropy_drift,
                children_count: n.children.len(),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let edges = self
            .events()
            .iter()
            .map(|e| GraphEdge {
                from: e.parent_id.clone(),
                to: e.child_id.clone(),
                entropy_diff: e.entropy_diff,
            })
            .collect();

        LineageGraph { nodes, edges, max_depth: self.totals().max_depth_observed }
    }
}
