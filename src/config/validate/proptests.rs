//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = EngineConfig> {
    (
        2usize..5000,   // max_samples_per_bloom
        0.0f64..=1.0,   // chaos_threshold
        0.1f64..10.0,   // anomaly_z_threshold
        1usize..500,    // pattern_window
        0u64..3600,     // chaos_cache_ttl_secs
    )
        .prop_flat_map(|(max_samples, chaos, z, pattern, ttl)| {
            (2usize..=max_samples).prop_map(move |window| EngineConfig {
                analyzer: AnalyzerConfig {
                    max_samples_per_bloom: max_samples,
                    volatility_window: window,
                    chaos_threshold: chaos,
                    chaos_cache_ttl_secs: ttl,
                    anomaly_z_threshold: z,
                },
                lineage: LineageConfig { pattern_window: pattern },
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(config in arb_valid_config()) {
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_zero_max_samples_fails(config in arb_valid_config()) {
        let mut config = config;
        config.analyzer.max_samples_per_bloom = 0;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidMaxSamples(0))
        ));
    }

    #[test]
    fn prop_chaos_threshold_above_one_fails(config in arb_valid_config(), excess in 0.001f64..10.0) {
        let mut config = config;
        config.analyzer.chaos_threshold = 1.0 + excess;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidChaosThreshold(_))
        ));
    }

    #[test]
    fn prop_window_beyond_buffer_fails(config in arb_valid_config(), extra in 1usize..100) {
        let mut config = config;
        config.analyzer.volatility_window = config.analyzer.max_samples_per_bloom + extra;
        let is_window_error = matches!(
            validate_config(&config),
            Err(ValidationError::InvalidVolatilityWindow { .. })
        );
        prop_assert!(is_window_error);
    }
}
