//! Concurrent entropy analyzer
//!
//! Per-bloom series sit behind their own mutex so writers to different
//! blooms never contend. Population scans clone the series handles under a
//! short read lock and then visit blooms one at a time.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::anomaly::detect_anomalies;
use super::chaos::{self, ChaosCache, MIN_CHAOS_SAMPLES};
use super::report::{
    assess_stability, recommendations, risk_factors, PhasePortrait, RecentBehavior,
    StabilityReport,
};
use super::series::BloomSeries;
use super::stats::{self, RunningStats};
use super::types::{
    ChaosAlert, EntropyAnomaly, EntropyCorrelation, EntropyProfile, EntropySample,
    InsufficientData, RiskLevel, ThermalState, DEFAULT_SOURCE,
};
use crate::config::AnalyzerConfig;

/// Samples each bloom needs before it is correlated
pub const MIN_CORRELATION_SAMPLES: usize = 10;
/// Most recent samples compared in a correlation
pub const CORRELATION_WINDOW: usize = 50;
/// Samples needed for a forecast
pub const MIN_FORECAST_SAMPLES: usize = 20;
/// Forecast noise std as a fraction of the historical std
pub const FORECAST_NOISE_SCALE: f64 = 0.3;
/// Samples needed for a phase portrait
pub const MIN_PORTRAIT_SAMPLES: usize = 3;

type SharedSeries = Arc<Mutex<BloomSeries>>;

/// Statistics over every sample ever ingested, evicted ones included
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalEntropyStats {
    pub total_samples: u64,
    pub mean: f64,
    /// Population std
    pub std: f64,
}

/// Bounded per-bloom entropy history with volatility, trend, anomaly,
/// correlation, forecast, and chaos-risk queries
///
/// All methods take `&self`; the analyzer is `Send + Sync`. Queries on
/// unknown or sparse blooms return neutral values rather than errors.
#[derive(Debug)]
pub struct EntropyAnalyzer {
    config: AnalyzerConfig,
    blooms: RwLock<HashMap<String, SharedSeries>>,
    global: Mutex<RunningStats>,
    chaos_cache: Mutex<ChaosCache>,
    alerts: Mutex<HashMap<String, ChaosAlert>>,
}

impl Default for EntropyAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl EntropyAnalyzer {
    /// Create an analyzer; the config is assumed validated
    pub fn new(config: AnalyzerConfig) -> Self {
        let ttl = config.chaos_cache_ttl();
        Self {
            config,
            blooms: RwLock::new(HashMap::new()),
            global: Mutex::new(RunningStats::default()),
            chaos_cache: Mutex::new(ChaosCache::new(ttl)),
            alerts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Record an entropy reading tagged with the default source
    pub fn add_entropy_sample(&self, bloom_id: &str, entropy: f64) -> EntropyProfile {
        self.add_entropy_sample_from(bloom_id, entropy, DEFAULT_SOURCE)
    }

    /// Record an entropy reading from a named source
    ///
    /// The value is clamped to `[0, 1]`; NaN is recorded as 0.
    pub fn add_entropy_sample_from(
        &self,
        bloom_id: &str,
        entropy: f64,
        source: &str,
    ) -> EntropyProfile {
        self.ingest(EntropySample {
            bloom_id: bloom_id.to_string(),
            entropy,
            timestamp: Utc::now(),
            source: source.to_string(),
        })
    }

    pub(crate) fn ingest(&self, mut sample: EntropySample) -> EntropyProfile {
        sample.entropy = clamp_entropy(sample.entropy);
        let entropy = sample.entropy;
        let bloom_id = sample.bloom_id.clone();
        let handle = self.series_or_insert(&bloom_id);

        let (profile, transition) = {
            let mut series = handle.lock().unwrap_or_else(PoisonError::into_inner);
            let transition = series.push(sample);
            (series.profile().clone(), transition)
        };

        self.global.lock().unwrap_or_else(PoisonError::into_inner).push(entropy);
        self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).expire_if_stale();

        if let Some((from, to)) = transition {
            tracing::info!(bloom = %bloom_id, %from, %to, entropy, "thermal state changed");
        }
        tracing::debug!(bloom = %bloom_id, entropy, samples = profile.sample_count, "entropy sample");

        profile
    }

    fn series_or_insert(&self, bloom_id: &str) -> SharedSeries {
        if let Some(handle) = self.series(bloom_id) {
            return handle;
        }
        let mut blooms = self.blooms.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(blooms.entry(bloom_id.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(BloomSeries::new(
                bloom_id,
                self.config.max_samples_per_bloom,
                self.config.volatility_window,
            )))
        }))
    }

    fn series(&self, bloom_id: &str) -> Option<SharedSeries> {
        self.blooms.read().unwrap_or_else(PoisonError::into_inner).get(bloom_id).cloned()
    }

    /// Point-in-time list of every bloom's series handle, sorted by id
    fn all_series(&self) -> Vec<(String, SharedSeries)> {
        let mut all: Vec<(String, SharedSeries)> = self
            .blooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    fn with_series<T>(&self, bloom_id: &str, f: impl FnOnce(&BloomSeries) -> T) -> Option<T> {
        let handle = self.series(bloom_id)?;
        let series = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&series))
    }

    // =========================================================================
    // Per-bloom queries
    // =========================================================================

    /// Sampled bloom ids, sorted
    pub fn bloom_ids(&self) -> Vec<String> {
        self.all_series().into_iter().map(|(id, _)| id).collect()
    }

    pub fn contains(&self, bloom_id: &str) -> bool {
        self.series(bloom_id).is_some()
    }

    /// Current profile, `None` for unknown blooms
    pub fn profile(&self, bloom_id: &str) -> Option<EntropyProfile> {
        self.with_series(bloom_id, |s| s.profile().clone())
    }

    /// Samples currently held for a bloom, oldest first
    pub fn samples(&self, bloom_id: &str) -> Vec<EntropySample> {
        self.with_series(bloom_id, |s| s.samples().iter().cloned().collect()).unwrap_or_default()
    }

    pub fn sample_count(&self, bloom_id: &str) -> usize {
        self.with_series(bloom_id, BloomSeries::len).unwrap_or(0)
    }

    /// Population variance of the bloom's window, 0 for unknown blooms
    pub fn get_entropy_variance(&self, bloom_id: &str) -> f64 {
        self.with_series(bloom_id, |s| s.profile().variance).unwrap_or(0.0)
    }

    pub fn thermal_state(&self, bloom_id: &str) -> Option<ThermalState> {
        self.with_series(bloom_id, BloomSeries::thermal)
    }

    /// `(timestamp, entropy)` pairs, oldest first, optionally only the last `window`
    pub fn get_entropy_trajectory(
        &self,
        bloom_id: &str,
        window: Option<usize>,
    ) -> Vec<(DateTime<Utc>, f64)> {
        self.with_series(bloom_id, |s| {
            let skip = window.map_or(0, |w| s.len().saturating_sub(w));
            s.samples().iter().skip(skip).map(|x| (x.timestamp, x.entropy)).collect()
        })
        .unwrap_or_default()
    }

    pub fn get_entropy_phase_portrait(
        &self,
        bloom_id: &str,
    ) -> Result<PhasePortrait, InsufficientData> {
        self.with_series(bloom_id, |s| {
            if s.len() < MIN_PORTRAIT_SAMPLES {
                return Err(InsufficientData::too_few(bloom_id, s.len(), MIN_PORTRAIT_SAMPLES));
            }
            Ok(PhasePortrait::from_samples(s.samples()))
        })
        .unwrap_or_else(|| Err(InsufficientData::no_data(bloom_id)))
    }

    /// Samples with |z| above `z_threshold` (the configured default when `None`)
    pub fn detect_entropy_anomalies(
        &self,
        bloom_id: &str,
        z_threshold: Option<f64>,
    ) -> Vec<EntropyAnomaly> {
        let z = z_threshold.unwrap_or(self.config.anomaly_z_threshold);
        self.with_series(bloom_id, |s| detect_anomalies(s.samples(), z)).unwrap_or_default()
    }

    /// Linear-trend forecast with Gaussian noise, drawing from the thread RNG
    pub fn predict_entropy_future(&self, bloom_id: &str, steps: usize) -> Vec<f64> {
        self.predict_entropy_future_with_rng(bloom_id, steps, &mut rand::rng())
    }

    /// Forecast `steps` values past the last sample
    ///
    /// Fits a least-squares line over the whole window, adds noise with std
    /// `0.3 × historical std`, and clamps each value to `[0, 1]`. Empty below
    /// the forecast sample minimum.
    pub fn predict_entropy_future_with_rng<R: Rng>(
        &self,
        bloom_id: &str,
        steps: usize,
        rng: &mut R,
    ) -> Vec<f64> {
        let Some(values) = self.with_series(bloom_id, BloomSeries::values) else {
            return Vec::new();
        };
        if values.len() < MIN_FORECAST_SAMPLES {
            return Vec::new();
        }

        let (slope, intercept) = stats::linear_fit(&values);
        let noise_std = stats::std_dev(&values) * FORECAST_NOISE_SCALE;
        let last_x = (values.len() - 1) as f64;

        (1..=steps)
            .map(|step| {
                // Box-Muller transform for Gaussian noise
                let u1: f64 = rng.random::<f64>().max(1e-10);
                let u2: f64 = rng.random::<f64>();
                let noise = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * noise_std;
                (slope * (last_x + step as f64) + intercept + noise).clamp(0.0, 1.0)
            })
            .collect()
    }

    /// Full stability report, or an error marker for unknown blooms
    pub fn get_stability_report(
        &self,
        bloom_id: &str,
    ) -> Result<StabilityReport, InsufficientData> {
        let chaos_score = self.chaos_score_or_compute(bloom_id);
        let z = self.config.anomaly_z_threshold;

        self.with_series(bloom_id, |s| {
            let profile = s.profile().clone();
            let anomaly_count = detect_anomalies(s.samples(), z).len();
            let recent_behavior = RecentBehavior::from_values(&s.values(), anomaly_count);

            StabilityReport {
                bloom_id: bloom_id.to_string(),
                stability_assessment: assess_stability(&profile, chaos_score),
                risk_factors: risk_factors(&profile, s.thermal(), chaos_score, anomaly_count),
                recommendations: recommendations(&profile, chaos_score),
                thermal_state: s.thermal(),
                chaos_score,
                recent_behavior,
                profile,
            }
        })
        .ok_or_else(|| InsufficientData::no_data(bloom_id))
    }

    // =========================================================================
    // Population queries
    // =========================================================================

    /// Blooms whose latest entropy is at least `threshold`, highest first
    pub fn get_hot_blooms(&self, threshold: f64) -> Vec<(String, f64)> {
        let mut hot: Vec<(String, f64)> = self
            .all_series()
            .into_iter()
            .filter_map(|(id, handle)| {
                let latest = handle.lock().unwrap_or_else(PoisonError::into_inner).latest()?;
                (latest >= threshold).then_some((id, latest))
            })
            .collect();
        hot.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        hot
    }

    /// Blooms currently in the hot state, sorted
    pub fn hot_bloom_ids(&self) -> Vec<String> {
        self.blooms_in_state(ThermalState::Hot)
    }

    /// Blooms currently cooling down, sorted
    pub fn cooling_bloom_ids(&self) -> Vec<String> {
        self.blooms_in_state(ThermalState::Cooling)
    }

    fn blooms_in_state(&self, state: ThermalState) -> Vec<String> {
        self.all_series()
            .into_iter()
            .filter(|(_, handle)| {
                handle.lock().unwrap_or_else(PoisonError::into_inner).thermal() == state
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Pearson correlations for every pair with enough history
    ///
    /// Each pair compares the most recent `min(50, len_a, len_b)` samples;
    /// pairs lacking data or variance are omitted.
    pub fn get_entropy_correlations<S: AsRef<str>>(
        &self,
        bloom_ids: &[S],
    ) -> Vec<EntropyCorrelation> {
        let windows: Vec<Option<Vec<f64>>> = bloom_ids
            .iter()
            .map(|id| {
                self.with_series(id.as_ref(), BloomSeries::values)
                    .filter(|values| values.len() >= MIN_CORRELATION_SAMPLES)
            })
            .collect();

        let mut correlations = Vec::new();
        for i in 0..bloom_ids.len() {
            for j in (i + 1)..bloom_ids.len() {
                let (Some(a), Some(b)) = (&windows[i], &windows[j]) else {
                    continue;
                };
                let n = CORRELATION_WINDOW.min(a.len()).min(b.len());
                if let Some(coefficient) = stats::pearson(&a[a.len() - n..], &b[b.len() - n..]) {
                    correlations.push(EntropyCorrelation {
                        bloom_a: bloom_ids[i].as_ref().to_string(),
                        bloom_b: bloom_ids[j].as_ref().to_string(),
                        coefficient,
                    });
                }
            }
        }
        correlations
    }

    /// Blooms whose chaos score reaches the threshold, riskiest first
    pub fn recommend_stabilization(&self) -> Vec<String> {
        self.stabilization_candidates().into_iter().map(|(id, _)| id).collect()
    }

    /// `(bloom, chaos score)` for every bloom at or above the threshold, riskiest first
    ///
    /// Scores come from the cache when fresh. Each candidate raises or
    /// refreshes its chaos alert.
    pub fn stabilization_candidates(&self) -> Vec<(String, f64)> {
        self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).expire_if_stale();
        let now = Utc::now();
        let threshold = self.config.chaos_threshold;

        let mut candidates = Vec::new();
        let mut raised = Vec::new();
        for (id, handle) in self.all_series() {
            let cached = self.cached_chaos_score(&id);
            let (score, alert) = {
                let series = handle.lock().unwrap_or_else(PoisonError::into_inner);
                if series.len() < MIN_CHAOS_SAMPLES {
                    continue;
                }
                let score = cached
                    .unwrap_or_else(|| chaos::chaos_score(&series, self.config.anomaly_z_threshold));
                let alert = (score >= threshold).then(|| chaos::build_alert(&series, score, now));
                (score, alert)
            };

            if cached.is_none() {
                self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).insert(&id, score);
            }
            if let Some(alert) = alert {
                candidates.push((id, score));
                raised.push(alert);
            }
        }

        let mut alerts = self.alerts.lock().unwrap_or_else(PoisonError::into_inner);
        alerts.retain(|_, alert| chaos::is_live(alert, now));
        for alert in raised {
            tracing::warn!(
                bloom = %alert.bloom_id,
                score = alert.chaos_score,
                risk = %alert.risk_level,
                "chaos alert"
            );
            alerts.insert(alert.bloom_id.clone(), alert);
        }
        drop(alerts);

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates
    }

    /// Cached chaos score, `None` if not scored since the cache last expired
    pub fn chaos_score(&self, bloom_id: &str) -> Option<f64> {
        self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).expire_if_stale();
        self.cached_chaos_score(bloom_id)
    }

    fn cached_chaos_score(&self, bloom_id: &str) -> Option<f64> {
        self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).get(bloom_id)
    }

    /// Cached score, computing and caching it when the bloom has enough samples
    fn chaos_score_or_compute(&self, bloom_id: &str) -> Option<f64> {
        if let Some(score) = self.chaos_score(bloom_id) {
            return Some(score);
        }
        let z = self.config.anomaly_z_threshold;
        let score = self
            .with_series(bloom_id, |s| chaos::ChaosFactors::from_series(s, z).map(|f| f.score()))
            .flatten()?;
        self.chaos_cache.lock().unwrap_or_else(PoisonError::into_inner).insert(bloom_id, score);
        Some(score)
    }

    /// Live chaos alerts, optionally only one risk level, highest score first
    pub fn get_chaos_alerts(&self, level: Option<RiskLevel>) -> Vec<ChaosAlert> {
        let now = Utc::now();
        let mut alerts = self.alerts.lock().unwrap_or_else(PoisonError::into_inner);
        alerts.retain(|_, alert| chaos::is_live(alert, now));

        let mut selected: Vec<ChaosAlert> = alerts
            .values()
            .filter(|alert| level.map_or(true, |l| alert.risk_level == l))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            b.chaos_score.total_cmp(&a.chaos_score).then_with(|| a.bloom_id.cmp(&b.bloom_id))
        });
        selected
    }

    /// Mean and std over every sample ever ingested
    pub fn global_stats(&self) -> GlobalEntropyStats {
        let running = *self.global.lock().unwrap_or_else(PoisonError::into_inner);
        GlobalEntropyStats { total_samples: running.count, mean: running.mean, std: running.std() }
    }

    pub(crate) fn running_stats(&self) -> RunningStats {
        *self.global.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn restore_running_stats(&self, stats: RunningStats) {
        *self.global.lock().unwrap_or_else(PoisonError::into_inner) = stats;
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0
fn clamp_entropy(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
