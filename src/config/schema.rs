//! YAML schema definitions for engine configuration
//!
//! Every field has a default, so an empty YAML document is a valid config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entropy analyzer settings
    pub analyzer: AnalyzerConfig,

    /// Lineage tracker settings
    pub lineage: LineageConfig,
}

/// Entropy analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Ring buffer capacity per bloom; oldest samples are evicted first
    pub max_samples_per_bloom: usize,

    /// Number of recent samples used for the volatility score
    pub volatility_window: usize,

    /// Chaos score at or above which a bloom is recommended for stabilization
    pub chaos_threshold: f64,

    /// Lifetime of cached chaos scores, in seconds
    pub chaos_cache_ttl_secs: u64,

    /// Default |z| above which a sample is flagged anomalous
    pub anomaly_z_threshold: f64,
}

impl AnalyzerConfig {
    /// Chaos cache lifetime as a [`Duration`]
    pub fn chaos_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.chaos_cache_ttl_secs)
    }

    /// Set the ring buffer capacity
    pub fn with_max_samples(mut self, max_samples_per_bloom: usize) -> Self {
        self.max_samples_per_bloom = max_samples_per_bloom;
        self
    }

    /// Set the volatility window
    pub fn with_volatility_window(mut self, volatility_window: usize) -> Self {
        self.volatility_window = volatility_window;
        self
    }

    /// Set the stabilization threshold
    pub fn with_chaos_threshold(mut self, chaos_threshold: f64) -> Self {
        self.chaos_threshold = chaos_threshold;
        self
    }

    /// Set the chaos cache lifetime
    pub fn with_chaos_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.chaos_cache_ttl_secs = secs;
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_samples_per_bloom: 1000,
            volatility_window: 20,
            chaos_threshold: 0.7,
            chaos_cache_ttl_secs: 60,
            anomaly_z_threshold: 2.5,
        }
    }
}

/// Lineage tracker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// Number of recent rebloom events considered by pattern analysis
    pub pattern_window: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self { pattern_window: 20 }
    }
}
