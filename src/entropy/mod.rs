//! Entropy Volatility Analysis
//!
//! Keeps a bounded history of entropy readings per bloom and derives from it:
//!
//! - **Profiles**: mean, population variance, extremes, trend, volatility score
//! - **Thermal states**: normal → hot → cooling → normal
//! - **Anomalies**: z-score outliers against the bloom's window
//! - **Chaos risk**: a weighted score of volatility, mean, oscillation,
//!   acceleration, and anomaly rate, cached for a configurable lifetime
//!
//! # Example
//!
//! ```
//! use entropia::entropy::EntropyAnalyzer;
//!
//! let analyzer = EntropyAnalyzer::default();
//! for i in 0..30 {
//!     analyzer.add_entropy_sample("bloom-a", 0.3 + 0.01 * (i % 3) as f64);
//! }
//! let report = analyzer.get_stability_report("bloom-a").unwrap();
//! assert!(report.chaos_score.is_some());
//! ```

mod analyzer;
mod anomaly;
mod chaos;
mod report;
mod series;
mod snapshot;
mod stats;
mod types;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use analyzer::{
    EntropyAnalyzer, GlobalEntropyStats, CORRELATION_WINDOW, FORECAST_NOISE_SCALE,
    MIN_CORRELATION_SAMPLES, MIN_FORECAST_SAMPLES, MIN_PORTRAIT_SAMPLES,
};
pub use anomaly::{detect_anomalies, HIGH_SEVERITY_Z, MIN_ANOMALY_SAMPLES};
pub use chaos::{ChaosFactors, ALERT_RETENTION_SECS, MIN_CHAOS_SAMPLES};
pub use report::{PhasePortrait, RecentBehavior, RiskFactor, StabilityLevel, StabilityReport};
pub use series::{HOT_ENTROPY, HOT_VOLATILITY, MIN_THERMAL_SAMPLES};
pub use snapshot::EntropySnapshot;
pub use stats::RunningStats;
pub use types::{
    AnomalyKind, AnomalySeverity, ChaosAlert, EntropyAnomaly, EntropyCorrelation, EntropyProfile,
    EntropySample, InsufficientData, RiskLevel, ThermalState, Trend, DEFAULT_SOURCE,
};
