//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid max_samples_per_bloom: {0} (must be > 0)")]
    InvalidMaxSamples(usize),

    #[error("Invalid volatility_window: {window} (must be >= 2 and <= max_samples_per_bloom {max_samples})")]
    InvalidVolatilityWindow { window: usize, max_samples: usize },

    #[error("Invalid chaos_threshold: {0} (must be in [0.0, 1.0])")]
    InvalidChaosThreshold(f64),

    #[error("Invalid anomaly_z_threshold: {0} (must be > 0.0)")]
    InvalidAnomalyThreshold(f64),

    #[error("Invalid pattern_window: {0} (must be > 0)")]
    InvalidPatternWindow(usize),
}
