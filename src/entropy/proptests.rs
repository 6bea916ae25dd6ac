//! Property-based tests for analyzer invariants

use super::*;
use crate::config::AnalyzerConfig;
use proptest::prelude::*;

fn arb_entropy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -0.5f64..1.5,
        1 => Just(f64::NAN),
        1 => prop_oneof![Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ]
}

fn arb_stream() -> impl Strategy<Value = Vec<(u8, f64)>> {
    proptest::collection::vec((0u8..4, arb_entropy()), 0..120)
}

fn analyzer_with(capacity: usize, stream: &[(u8, f64)]) -> EntropyAnalyzer {
    let analyzer = EntropyAnalyzer::new(
        AnalyzerConfig::default().with_max_samples(capacity).with_volatility_window(5),
    );
    for (bloom, entropy) in stream {
        analyzer.add_entropy_sample(&format!("b{bloom}"), *entropy);
    }
    analyzer
}

proptest! {
    #[test]
    fn prop_stored_entropy_within_unit_interval(stream in arb_stream()) {
        let analyzer = analyzer_with(1000, &stream);
        for id in analyzer.bloom_ids() {
            for sample in analyzer.samples(&id) {
                prop_assert!((0.0..=1.0).contains(&sample.entropy));
            }
        }
    }

    #[test]
    fn prop_history_never_exceeds_capacity(capacity in 1usize..16, stream in arb_stream()) {
        let analyzer = analyzer_with(capacity, &stream);
        for id in analyzer.bloom_ids() {
            prop_assert!(analyzer.sample_count(&id) <= capacity);
        }
        prop_assert_eq!(analyzer.global_stats().total_samples, stream.len() as u64);
    }

    #[test]
    fn prop_profile_is_consistent(stream in arb_stream()) {
        let analyzer = analyzer_with(50, &stream);
        for id in analyzer.bloom_ids() {
            let profile = analyzer.profile(&id).unwrap();
            prop_assert!(profile.variance >= 0.0);
            prop_assert!(profile.min <= profile.mean + 1e-12);
            prop_assert!(profile.mean <= profile.max + 1e-12);
            prop_assert!((0.0..=1.0).contains(&profile.volatility_score));
            prop_assert_eq!(profile.sample_count, analyzer.sample_count(&id));
        }
    }

    #[test]
    fn prop_stabilization_scores_sorted_and_bounded(stream in arb_stream()) {
        let analyzer = analyzer_with(1000, &stream);
        let candidates = analyzer.stabilization_candidates();
        for (_, score) in &candidates {
            prop_assert!((0.0..=1.0).contains(score));
            prop_assert!(*score >= analyzer.config().chaos_threshold);
        }
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn prop_forecast_bounded(values in proptest::collection::vec(0.0f64..=1.0, 20..60), steps in 0usize..20) {
        let analyzer = EntropyAnalyzer::default();
        for v in &values {
            analyzer.add_entropy_sample("b", *v);
        }
        let forecast = analyzer.predict_entropy_future("b", steps);
        prop_assert_eq!(forecast.len(), steps);
        prop_assert!(forecast.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
