//! Value types for the entropy analyzer.
//!
//! Samples, derived profiles, anomaly records, chaos alerts, and the
//! insufficient-data marker returned by queries that need history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag applied when the producer does not supply one
pub const DEFAULT_SOURCE: &str = "bloom";

/// One clamped entropy reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropySample {
    pub bloom_id: String,
    /// Always within `[0, 1]`
    pub entropy: f64,
    pub timestamp: DateTime<Utc>,
    /// Producer tag (bloom, sigil, memory, thermal, ...)
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Direction of recent entropy movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    #[default]
    Stable,
    Increasing,
    Decreasing,
    Oscillating,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Stable => write!(f, "stable"),
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Oscillating => write!(f, "oscillating"),
        }
    }
}

/// Statistical summary of one bloom's current sample window
///
/// Recomputed from the samples after every ingestion; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyProfile {
    pub bloom_id: String,
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub trend: Trend,
    /// Normalized std of first differences over the volatility window, in `[0, 1]`
    pub volatility_score: f64,
    pub sample_count: usize,
    pub last_sample_time: Option<DateTime<Utc>>,
}

impl EntropyProfile {
    /// Profile of a bloom with no samples
    pub fn empty(bloom_id: impl Into<String>) -> Self {
        Self {
            bloom_id: bloom_id.into(),
            mean: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            trend: Trend::Stable,
            volatility_score: 0.0,
            sample_count: 0,
            last_sample_time: None,
        }
    }
}

/// Hysteresis state of a bloom
///
/// `Normal → Hot → Cooling → Normal`; a hot bloom always passes through
/// cooling before it is normal again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalState {
    #[default]
    Normal,
    Hot,
    Cooling,
}

impl std::fmt::Display for ThermalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThermalState::Normal => write!(f, "normal"),
            ThermalState::Hot => write!(f, "hot"),
            ThermalState::Cooling => write!(f, "cooling"),
        }
    }
}

/// Anomaly severity by |z|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    /// Above the detection threshold, at most 3.5
    Medium,
    /// Above 3.5
    High,
}

/// Whether an anomalous sample sits above or below the mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

/// A sample whose z-score exceeded the detection threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyAnomaly {
    pub timestamp: DateTime<Utc>,
    pub entropy: f64,
    /// Absolute z-score against the bloom's full-history mean and std
    pub z_score: f64,
    pub severity: AnomalySeverity,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub source: String,
}

/// Pearson correlation between two blooms' recent samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyCorrelation {
    pub bloom_a: String,
    pub bloom_b: String,
    pub coefficient: f64,
}

/// Chaos alert risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Tier for a chaos score: above 0.9 critical, above 0.8 high, above 0.7 medium
    pub fn from_score(score: f64) -> Self {
        if score > 0.9 {
            RiskLevel::Critical
        } else if score > 0.8 {
            RiskLevel::High
        } else if score > 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Raised when a bloom's chaos score reaches the stabilization threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaosAlert {
    pub bloom_id: String,
    pub chaos_score: f64,
    pub risk_level: RiskLevel,
    /// Estimated cascade time, only for scores above 0.8
    pub predicted_cascade_time: Option<DateTime<Utc>>,
    pub recommended_actions: Vec<String>,
    pub raised_at: DateTime<Utc>,
}

/// A query needed more history than the bloom has
///
/// Serializes as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct InsufficientData {
    pub error: String,
}

impl InsufficientData {
    /// The bloom has never been sampled
    pub fn no_data(bloom_id: &str) -> Self {
        Self { error: format!("No data available for bloom {bloom_id}") }
    }

    /// The bloom has fewer than `required` samples
    pub fn too_few(bloom_id: &str, have: usize, required: usize) -> Self {
        Self {
            error: format!(
                "Insufficient data for bloom {bloom_id}: {have} samples, need {required}"
            ),
        }
    }
}
