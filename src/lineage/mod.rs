//! Bloom Lineage Tracking
//!
//! Maintains the derivation forest of blooms: each bloom has at most one
//! parent, a depth below its root, and a cumulative entropy drift. Rejected
//! derivations (self-parenting, a second parent, cycles) leave the forest
//! untouched and are reported as `false` from [`LineageTracker::log_rebloom`].

mod node;
mod snapshot;
mod stats;
mod tracker;

#[cfg(test)]
mod proptests;

pub use node::{BloomNode, RebloomEvent, RebloomRejection};
pub use snapshot::LineageSnapshot;
pub use stats::{
    DriftDirection, DriftStatistics, GraphEdge, GraphNode, LineageGraph, LineageStatistics,
    RebloomPatterns,
};
pub use tracker::{Ancestors, LineageTotals, LineageTracker};
