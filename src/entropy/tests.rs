//! Tests for the entropy analyzer

use super::*;
use crate::config::AnalyzerConfig;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn feed(analyzer: &EntropyAnalyzer, bloom: &str, values: impl IntoIterator<Item = f64>) {
    for value in values {
        analyzer.add_entropy_sample(bloom, value);
    }
}

fn chaotic(i: usize) -> f64 {
    let wobble = if i % 2 == 1 { 0.04 } else { 0.0 };
    if i % 10 < 5 {
        0.2 + wobble
    } else {
        0.9 - wobble
    }
}

fn calm(i: usize) -> f64 {
    0.3 + 0.05 * (1.7 * i as f64).sin()
}

#[test]
fn test_samples_are_clamped() {
    let analyzer = EntropyAnalyzer::default();
    analyzer.add_entropy_sample("b", 1.5);
    analyzer.add_entropy_sample("b", -0.2);
    analyzer.add_entropy_sample("b", f64::NAN);
    analyzer.add_entropy_sample("b", f64::INFINITY);

    let values: Vec<f64> = analyzer.samples("b").iter().map(|s| s.entropy).collect();
    assert_eq!(values, vec![1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_source_tag_recorded() {
    let analyzer = EntropyAnalyzer::default();
    analyzer.add_entropy_sample("b", 0.4);
    analyzer.add_entropy_sample_from("b", 0.5, "sigil");

    let sources: Vec<String> = analyzer.samples("b").into_iter().map(|s| s.source).collect();
    assert_eq!(sources, vec![DEFAULT_SOURCE.to_string(), "sigil".to_string()]);
}

#[test]
fn test_unknown_bloom_queries_are_neutral() {
    let analyzer = EntropyAnalyzer::default();
    assert_eq!(analyzer.get_entropy_variance("ghost"), 0.0);
    assert!(analyzer.profile("ghost").is_none());
    assert_eq!(analyzer.sample_count("ghost"), 0);
    assert!(analyzer.detect_entropy_anomalies("ghost", None).is_empty());
    assert!(analyzer.predict_entropy_future("ghost", 5).is_empty());
    assert!(analyzer.get_entropy_trajectory("ghost", None).is_empty());
    assert!(analyzer.chaos_score("ghost").is_none());

    let err = analyzer.get_stability_report("ghost").unwrap_err();
    assert!(err.error.contains("ghost"));
    assert!(analyzer.get_entropy_phase_portrait("ghost").is_err());
}

#[test]
fn test_ring_buffer_is_bounded() {
    let analyzer = EntropyAnalyzer::new(AnalyzerConfig::default().with_max_samples(5));
    feed(&analyzer, "b", (0..12).map(|i| i as f64 / 20.0));

    assert_eq!(analyzer.sample_count("b"), 5);
    let values: Vec<f64> = analyzer.samples("b").iter().map(|s| s.entropy).collect();
    assert_relative_eq!(values[0], 0.35, epsilon = 1e-12);
    assert_relative_eq!(values[4], 0.55, epsilon = 1e-12);

    // Global statistics still count the evicted samples
    assert_eq!(analyzer.global_stats().total_samples, 12);
}

#[test]
fn test_profile_returned_from_ingestion() {
    let analyzer = EntropyAnalyzer::default();
    analyzer.add_entropy_sample("b", 0.2);
    let profile = analyzer.add_entropy_sample("b", 0.4);

    assert_eq!(profile.sample_count, 2);
    assert_relative_eq!(profile.mean, 0.3, epsilon = 1e-12);
    assert_relative_eq!(analyzer.get_entropy_variance("b"), 0.01, epsilon = 1e-12);
}

#[test]
fn test_hot_blooms_sorted_by_latest() {
    let analyzer = EntropyAnalyzer::default();
    analyzer.add_entropy_sample("warm", 0.75);
    analyzer.add_entropy_sample("cold", 0.2);
    analyzer.add_entropy_sample("hottest", 0.9);
    analyzer.add_entropy_sample("tie", 0.75);

    let hot = analyzer.get_hot_blooms(0.7);
    let ids: Vec<&str> = hot.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["hottest", "tie", "warm"]);
}

#[test]
fn test_thermal_sets_follow_transitions() {
    let analyzer = EntropyAnalyzer::new(AnalyzerConfig::default().with_volatility_window(3));
    feed(&analyzer, "b", [0.1, 0.95, 0.1, 0.95, 0.1, 0.95]);
    assert_eq!(analyzer.thermal_state("b"), Some(ThermalState::Hot));
    assert_eq!(analyzer.hot_bloom_ids(), vec!["b".to_string()]);

    analyzer.add_entropy_sample("b", 0.3);
    assert!(analyzer.hot_bloom_ids().is_empty());
    assert_eq!(analyzer.cooling_bloom_ids(), vec!["b".to_string()]);
}

#[test]
fn test_single_spike_is_high_severity_anomaly() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", std::iter::repeat(0.5).take(19));
    analyzer.add_entropy_sample("b", 0.95);

    let anomalies = analyzer.detect_entropy_anomalies("b", None);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::Spike);
    assert_eq!(anomalies[0].severity, AnomalySeverity::High);
    assert_relative_eq!(anomalies[0].entropy, 0.95);

    // A looser threshold on the same data
    assert_eq!(analyzer.detect_entropy_anomalies("b", Some(5.0)).len(), 0);
}

#[test]
fn test_correlations_skip_sparse_and_flat_blooms() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "a", (0..20).map(|i| 0.1 + 0.01 * i as f64));
    feed(&analyzer, "b", (0..30).map(|i| 0.2 + 0.02 * i as f64));
    feed(&analyzer, "inverse", (0..20).map(|i| 0.9 - 0.01 * i as f64));
    feed(&analyzer, "sparse", [0.1, 0.2, 0.3]);
    feed(&analyzer, "flat", std::iter::repeat(0.5).take(20));

    let correlations =
        analyzer.get_entropy_correlations(&["a", "b", "inverse", "sparse", "flat", "ghost"]);
    assert_eq!(correlations.len(), 3);

    let ab = &correlations[0];
    assert_eq!((ab.bloom_a.as_str(), ab.bloom_b.as_str()), ("a", "b"));
    assert_relative_eq!(ab.coefficient, 1.0, epsilon = 1e-9);

    let a_inverse = &correlations[1];
    assert_eq!(a_inverse.bloom_b, "inverse");
    assert_relative_eq!(a_inverse.coefficient, -1.0, epsilon = 1e-9);
}

#[test]
fn test_forecast_of_flat_series_is_flat() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", std::iter::repeat(0.4).take(25));

    let mut rng = StdRng::seed_from_u64(7);
    let forecast = analyzer.predict_entropy_future_with_rng("b", 4, &mut rng);
    assert_eq!(forecast.len(), 4);
    for value in forecast {
        assert_relative_eq!(value, 0.4, epsilon = 1e-9);
    }
}

#[test]
fn test_forecast_needs_twenty_samples_and_stays_in_range() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", (0..19).map(|i| i as f64 / 19.0));
    assert!(analyzer.predict_entropy_future("b", 3).is_empty());

    analyzer.add_entropy_sample("b", 1.0);
    let forecast = analyzer.predict_entropy_future("b", 10);
    assert_eq!(forecast.len(), 10);
    assert!(forecast.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_chaotic_bloom_recommended_and_alerted() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "chaotic", (0..50).map(chaotic));
    feed(&analyzer, "calm", (0..50).map(calm));
    feed(&analyzer, "young", (0..10).map(chaotic));

    let candidates = analyzer.stabilization_candidates();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].0, "chaotic");
    assert_relative_eq!(candidates[0].1, 0.7192, epsilon = 1e-3);
    assert_eq!(analyzer.recommend_stabilization(), vec!["chaotic".to_string()]);

    // Scores for every eligible bloom are cached, not just candidates
    assert!(analyzer.chaos_score("calm").is_some());
    assert!(analyzer.chaos_score("young").is_none());

    let alerts = analyzer.get_chaos_alerts(None);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].risk_level, RiskLevel::Medium);
    assert!(alerts[0].predicted_cascade_time.is_none());
    assert_eq!(analyzer.get_chaos_alerts(Some(RiskLevel::Medium)).len(), 1);
    assert!(analyzer.get_chaos_alerts(Some(RiskLevel::High)).is_empty());
}

#[test]
fn test_repeated_recommendation_keeps_one_alert_per_bloom() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "chaotic", (0..50).map(chaotic));
    analyzer.recommend_stabilization();
    analyzer.recommend_stabilization();
    assert_eq!(analyzer.get_chaos_alerts(None).len(), 1);
}

#[test]
fn test_zero_ttl_cache_never_serves_scores() {
    let config = AnalyzerConfig::default().with_chaos_cache_ttl_secs(0);
    let analyzer = EntropyAnalyzer::new(config);
    feed(&analyzer, "chaotic", (0..50).map(chaotic));

    assert_eq!(analyzer.recommend_stabilization(), vec!["chaotic".to_string()]);
    assert!(analyzer.chaos_score("chaotic").is_none());
}

#[test]
fn test_stability_report_for_calm_bloom() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "calm", (0..50).map(calm));

    let report = analyzer.get_stability_report("calm").unwrap();
    assert_eq!(report.stability_assessment, StabilityLevel::Stable);
    assert_relative_eq!(report.chaos_score.unwrap(), 0.2306, epsilon = 1e-3);
    assert!(report.risk_factors.is_empty());
    assert_eq!(report.recent_behavior.window, 20);
    assert_eq!(report.thermal_state, ThermalState::Normal);
    assert!(report.profile.max < 0.36);
}

#[test]
fn test_stability_report_for_chaotic_bloom() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "chaotic", (0..50).map(chaotic));

    let report = analyzer.get_stability_report("chaotic").unwrap();
    assert_eq!(report.profile.trend, Trend::Oscillating);
    assert_eq!(report.stability_assessment, StabilityLevel::HighlyUnstable);
    assert!(report.risk_factors.contains(&RiskFactor::ExtremeVolatility));
    assert!(report.risk_factors.contains(&RiskFactor::OscillatingPattern));
    assert!(!report.recommendations.is_empty());
}

#[test]
fn test_report_without_chaos_score_for_short_history() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", [0.4, 0.45, 0.5]);
    let report = analyzer.get_stability_report("b").unwrap();
    assert!(report.chaos_score.is_none());
    assert_eq!(report.recent_behavior.window, 3);
    assert_eq!(report.recent_behavior.trend, Trend::Increasing);
}

#[test]
fn test_trajectory_window() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", [0.1, 0.2, 0.3, 0.4]);

    let last_two: Vec<f64> =
        analyzer.get_entropy_trajectory("b", Some(2)).into_iter().map(|(_, e)| e).collect();
    assert_eq!(last_two, vec![0.3, 0.4]);
    assert_eq!(analyzer.get_entropy_trajectory("b", Some(10)).len(), 4);
    assert_eq!(analyzer.get_entropy_trajectory("b", None).len(), 4);
}

#[test]
fn test_phase_portrait_needs_three_samples() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "b", [0.1, 0.2]);
    let err = analyzer.get_entropy_phase_portrait("b").unwrap_err();
    assert!(err.error.contains("need 3"));

    analyzer.add_entropy_sample("b", 0.3);
    let portrait = analyzer.get_entropy_phase_portrait("b").unwrap();
    assert_eq!(portrait.trajectory_length, 2);
    assert_eq!(portrait.entropy, vec![0.2, 0.3]);
}

#[test]
fn test_global_stats_over_all_blooms() {
    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "a", [0.2, 0.4]);
    feed(&analyzer, "b", [0.6, 0.8]);

    let stats = analyzer.global_stats();
    assert_eq!(stats.total_samples, 4);
    assert_relative_eq!(stats.mean, 0.5, epsilon = 1e-12);
    assert_relative_eq!(stats.std, 0.05f64.sqrt(), epsilon = 1e-12);
    assert_eq!(analyzer.bloom_ids(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_concurrent_ingestion() {
    let analyzer = EntropyAnalyzer::default();
    std::thread::scope(|scope| {
        for t in 0..4 {
            let analyzer = &analyzer;
            scope.spawn(move || {
                for i in 0..100 {
                    analyzer.add_entropy_sample(&format!("own-{t}"), (i % 10) as f64 / 10.0);
                    analyzer.add_entropy_sample("shared", 0.5);
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..20 {
                analyzer.recommend_stabilization();
                analyzer.get_hot_blooms(0.5);
            }
        });
    });

    assert_eq!(analyzer.global_stats().total_samples, 800);
    assert_eq!(analyzer.sample_count("shared"), 400);
    assert_eq!(analyzer.sample_count("own-3"), 100);
}

#[test]
fn test_snapshot_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entropy.json");

    let analyzer = EntropyAnalyzer::new(AnalyzerConfig::default().with_max_samples(30));
    feed(&analyzer, "chaotic", (0..50).map(chaotic));
    feed(&analyzer, "calm", (0..10).map(calm));
    analyzer.save_to_file(&path).unwrap();

    let restored = EntropyAnalyzer::load_from_file(&path).unwrap();
    assert_eq!(restored.config(), analyzer.config());
    assert_eq!(restored.samples("chaotic"), analyzer.samples("chaotic"));
    assert_eq!(restored.profile("calm"), analyzer.profile("calm"));
    assert_eq!(restored.global_stats(), analyzer.global_stats());
    assert_eq!(restored.global_stats().total_samples, 60);
}

#[test]
fn test_load_missing_snapshot_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = EntropyAnalyzer::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, crate::error::Error::Io { .. }));
}

#[test]
fn test_load_rejects_snapshot_with_invalid_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entropy.json");

    let analyzer = EntropyAnalyzer::default();
    feed(&analyzer, "calm", (0..10).map(calm));
    let mut snapshot = analyzer.save_snapshot();
    snapshot.config.max_samples_per_bloom = 0;
    std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let err = EntropyAnalyzer::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::Validation(crate::config::ValidationError::InvalidMaxSamples(0))
    ));
}
