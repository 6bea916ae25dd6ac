//! Property-based tests for lineage invariants

use super::*;
use proptest::prelude::*;

fn arb_reblooms() -> impl Strategy<Value = Vec<(u8, u8, f64)>> {
    proptest::collection::vec((0u8..20, 0u8..20, -1.0f64..1.0), 0..80)
}

fn build(reblooms: &[(u8, u8, f64)]) -> LineageTracker {
    let mut tracker = LineageTracker::new();
    for (parent, child, diff) in reblooms {
        tracker.log_rebloom(&format!("b{parent}"), &format!("b{child}"), *diff, None);
    }
    tracker
}

proptest! {
    #[test]
    fn prop_depth_is_parent_depth_plus_one(reblooms in arb_reblooms()) {
        let tracker = build(&reblooms);
        for node in tracker.nodes() {
            match &node.parent_id {
                None => prop_assert_eq!(tracker.get_depth(&node.id), 0),
                Some(parent) => prop_assert_eq!(
                    tracker.get_depth(&node.id),
                    tracker.get_depth(parent) + 1
                ),
            }
        }
    }

    #[test]
    fn prop_drift_is_parent_drift_plus_delta(reblooms in arb_reblooms()) {
        let tracker = build(&reblooms);
        for node in tracker.nodes() {
            let expected = match &node.parent_id {
                None => 0.0,
                Some(parent) => {
                    tracker.node(parent).map_or(f64::NAN, |p| p.total_entropy_drift)
                        + node.entropy_delta_from_parent
                }
            };
            prop_assert!((node.total_entropy_drift - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_self_rebloom_never_changes_state(reblooms in arb_reblooms(), id in 0u8..20, diff in -5.0f64..5.0) {
        let mut tracker = build(&reblooms);
        let events_before = tracker.events().to_vec();
        let len_before = tracker.len();
        let bloom = format!("b{id}");

        prop_assert!(!tracker.log_rebloom(&bloom, &bloom, diff, None));
        prop_assert_eq!(tracker.events(), events_before.as_slice());
        prop_assert_eq!(tracker.len(), len_before);
    }

    #[test]
    fn prop_parent_is_never_reassigned(reblooms in arb_reblooms(), other in 0u8..20) {
        let mut tracker = build(&reblooms);
        let parented: Vec<(String, String)> = tracker
            .nodes()
            .filter_map(|n| n.parent_id.clone().map(|p| (n.id.clone(), p)))
            .collect();

        let stranger = format!("b{other}");
        for (child, parent) in parented {
            prop_assert!(!tracker.log_rebloom(&stranger, &child, 0.1, None));
            prop_assert_eq!(tracker.parent(&child), Some(parent.as_str()));
        }
    }

    #[test]
    fn prop_ancestor_walk_terminates_at_root(reblooms in arb_reblooms()) {
        let tracker = build(&reblooms);
        for node in tracker.nodes() {
            let ancestors: Vec<&str> = tracker.get_ancestors(&node.id).collect();
            prop_assert_eq!(ancestors.len() as i64, tracker.get_depth(&node.id));
            if let Some(last) = ancestors.last() {
                prop_assert!(tracker.node(last).is_some_and(BloomNode::is_root));
            }
        }
    }

    #[test]
    fn prop_descendants_exclude_self_and_are_unique(reblooms in arb_reblooms(), id in 0u8..20) {
        let tracker = build(&reblooms);
        let bloom = format!("b{id}");
        let descendants = tracker.get_descendants(&bloom);
        let unique: std::collections::HashSet<_> = descendants.iter().collect();
        prop_assert_eq!(unique.len(), descendants.len());
        prop_assert!(!descendants.contains(&bloom));
    }

    #[test]
    fn prop_snapshot_replay_is_identical(reblooms in arb_reblooms()) {
        let tracker = build(&reblooms);
        let restored = LineageTracker::from_snapshot(&tracker.save_snapshot());
        prop_assert_eq!(restored.events(), tracker.events());
        prop_assert_eq!(restored.len(), tracker.len());
        for node in tracker.nodes() {
            prop_assert_eq!(restored.get_depth(&node.id), tracker.get_depth(&node.id));
        }
    }
}
