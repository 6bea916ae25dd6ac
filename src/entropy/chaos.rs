//! Chaos-risk scoring, the score cache, and alert construction

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use super::anomaly::detect_anomalies;
use super::report::recommendations;
use super::series::BloomSeries;
use super::stats;
use super::types::{ChaosAlert, RiskLevel, Trend};

/// Samples needed before a bloom is scored
pub const MIN_CHAOS_SAMPLES: usize = 20;
/// Window of most recent samples used for the acceleration factor
pub const ACCELERATION_WINDOW: usize = 10;
/// Alerts older than this are pruned
pub const ALERT_RETENTION_SECS: i64 = 3600;

const WEIGHTS: [f64; 5] = [0.30, 0.20, 0.20, 0.15, 0.15];

/// The five normalized inputs of a chaos score, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaosFactors {
    pub volatility: f64,
    pub mean_entropy: f64,
    /// 0.8 when oscillating, else 0.2
    pub oscillation: f64,
    /// Mean |second difference| of the last ten samples, ×5
    ///
    /// Magnitudes, not the signed mean: signed second differences of an
    /// oscillating series cancel to near zero.
    pub acceleration: f64,
    /// Anomalous fraction of the window, ×10
    pub anomaly_rate: f64,
}

impl ChaosFactors {
    /// Factors for a series, `None` below [`MIN_CHAOS_SAMPLES`]
    pub fn from_series(series: &BloomSeries, z_threshold: f64) -> Option<Self> {
        if series.len() < MIN_CHAOS_SAMPLES {
            return None;
        }
        let profile = series.profile();
        let values = series.values();
        let recent = &values[values.len() - ACCELERATION_WINDOW..];
        let anomalies = detect_anomalies(series.samples(), z_threshold).len();

        Some(Self {
            volatility: profile.volatility_score,
            mean_entropy: profile.mean,
            oscillation: if profile.trend == Trend::Oscillating { 0.8 } else { 0.2 },
            acceleration: (stats::mean_abs_acceleration(recent) * 5.0).min(1.0),
            anomaly_rate: (anomalies as f64 / values.len() as f64 * 10.0).min(1.0),
        })
    }

    /// Weighted combination, clamped to `[0, 1]`
    pub fn score(&self) -> f64 {
        let factors = [
            self.volatility,
            self.mean_entropy,
            self.oscillation,
            self.acceleration,
            self.anomaly_rate,
        ];
        factors.iter().zip(WEIGHTS).map(|(f, w)| f * w).sum::<f64>().clamp(0.0, 1.0)
    }
}

/// Chaos score of a series, 0 below the sample minimum
pub fn chaos_score(series: &BloomSeries, z_threshold: f64) -> f64 {
    ChaosFactors::from_series(series, z_threshold).map_or(0.0, |f| f.score())
}

/// Time-bounded cache of per-bloom chaos scores
///
/// The whole cache is dropped once it is older than its lifetime.
#[derive(Debug)]
pub struct ChaosCache {
    scores: HashMap<String, f64>,
    refreshed_at: Instant,
    ttl: std::time::Duration,
}

impl ChaosCache {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self { scores: HashMap::new(), refreshed_at: Instant::now(), ttl }
    }

    /// Drop every score if the cache outlived its lifetime
    pub fn expire_if_stale(&mut self) {
        if self.refreshed_at.elapsed() >= self.ttl {
            if !self.scores.is_empty() {
                tracing::debug!(entries = self.scores.len(), "chaos score cache expired");
            }
            self.scores.clear();
            self.refreshed_at = Instant::now();
        }
    }

    pub fn get(&self, bloom_id: &str) -> Option<f64> {
        self.scores.get(bloom_id).copied()
    }

    pub fn insert(&mut self, bloom_id: &str, score: f64) {
        self.scores.insert(bloom_id.to_string(), score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }
}

/// Build an alert for a bloom whose score reached the stabilization threshold
pub fn build_alert(series: &BloomSeries, score: f64, now: DateTime<Utc>) -> ChaosAlert {
    let predicted_cascade_time = (score > 0.8).then(|| {
        let hours = (24.0 * (1.0 - score)).max(1.0);
        now + Duration::seconds((hours * 3600.0).round() as i64)
    });

    ChaosAlert {
        bloom_id: series.profile().bloom_id.clone(),
        chaos_score: score,
        risk_level: RiskLevel::from_score(score),
        predicted_cascade_time,
        recommended_actions: recommendations(series.profile(), Some(score)),
        raised_at: now,
    }
}

/// Whether an alert is still within its retention window
pub fn is_live(alert: &ChaosAlert, now: DateTime<Utc>) -> bool {
    now - alert.raised_at < Duration::seconds(ALERT_RETENTION_SECS)
}
