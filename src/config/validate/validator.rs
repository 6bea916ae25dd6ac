//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::EngineConfig;

/// Validate an engine configuration
///
/// Checks that every numeric setting lies in its allowed range. NaN
/// thresholds are rejected.
pub fn validate_config(config: &EngineConfig) -> Result<(), ValidationError> {
    let analyzer = &config.analyzer;

    if analyzer.max_samples_per_bloom == 0 {
        return Err(ValidationError::InvalidMaxSamples(analyzer.max_samples_per_bloom));
    }

    if analyzer.volatility_window < 2 || analyzer.volatility_window > analyzer.max_samples_per_bloom
    {
        return Err(ValidationError::InvalidVolatilityWindow {
            window: analyzer.volatility_window,
            max_samples: analyzer.max_samples_per_bloom,
        });
    }

    if !(0.0..=1.0).contains(&analyzer.chaos_threshold) {
        return Err(ValidationError::InvalidChaosThreshold(analyzer.chaos_threshold));
    }

    if analyzer.anomaly_z_threshold.is_nan() || analyzer.anomaly_z_threshold <= 0.0 {
        return Err(ValidationError::InvalidAnomalyThreshold(analyzer.anomaly_z_threshold));
    }

    if config.lineage.pattern_window == 0 {
        return Err(ValidationError::InvalidPatternWindow(config.lineage.pattern_window));
    }

    Ok(())
}
