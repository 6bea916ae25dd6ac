//! Per-bloom ring buffer, cached profile, and thermal state machine

use std::collections::VecDeque;

use super::stats;
use super::types::{EntropyProfile, EntropySample, ThermalState};

/// Entropy above which a volatile bloom turns hot
pub const HOT_ENTROPY: f64 = 0.7;
/// Volatility above which a high-entropy bloom turns hot
pub const HOT_VOLATILITY: f64 = 0.5;
/// Entropy below which a hot bloom starts cooling
pub const COOLING_ENTROPY: f64 = 0.5;
/// Volatility below which a cooling bloom is stable again
pub const STABILIZED_VOLATILITY: f64 = 0.2;
/// Samples needed before thermal transitions are considered
pub const MIN_THERMAL_SAMPLES: usize = 5;

/// Bounded sample history of one bloom
#[derive(Debug, Clone)]
pub struct BloomSeries {
    samples: VecDeque<EntropySample>,
    capacity: usize,
    volatility_window: usize,
    profile: EntropyProfile,
    thermal: ThermalState,
}

impl BloomSeries {
    pub fn new(bloom_id: &str, capacity: usize, volatility_window: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            volatility_window,
            profile: EntropyProfile::empty(bloom_id),
            thermal: ThermalState::Normal,
        }
    }

    /// Append a sample, evicting the oldest once full, and refresh the profile
    ///
    /// Returns the thermal transition this sample caused, if any.
    pub fn push(&mut self, sample: EntropySample) -> Option<(ThermalState, ThermalState)> {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.refresh_profile();
        self.update_thermal()
    }

    fn refresh_profile(&mut self) {
        let values = self.values();
        let last_sample_time = self.samples.back().map(|s| s.timestamp);

        self.profile = EntropyProfile {
            bloom_id: self.profile.bloom_id.clone(),
            mean: stats::mean(&values),
            variance: stats::variance(&values),
            std_dev: stats::std_dev(&values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            trend: stats::classify_trend(&values),
            volatility_score: stats::volatility_score(&values, self.volatility_window),
            sample_count: values.len(),
            last_sample_time,
        };
    }

    fn update_thermal(&mut self) -> Option<(ThermalState, ThermalState)> {
        if self.samples.len() < MIN_THERMAL_SAMPLES {
            return None;
        }
        let entropy = self.latest()?;
        let volatility = self.profile.volatility_score;
        let hot = entropy > HOT_ENTROPY && volatility > HOT_VOLATILITY;

        let next = match self.thermal {
            ThermalState::Normal | ThermalState::Cooling if hot => ThermalState::Hot,
            ThermalState::Hot if entropy < COOLING_ENTROPY => ThermalState::Cooling,
            ThermalState::Cooling if volatility < STABILIZED_VOLATILITY => ThermalState::Normal,
            current => current,
        };

        if next == self.thermal {
            return None;
        }
        let previous = std::mem::replace(&mut self.thermal, next);
        Some((previous, next))
    }

    /// Entropy values, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.entropy).collect()
    }

    pub fn samples(&self) -> &VecDeque<EntropySample> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().map(|s| s.entropy)
    }

    pub fn profile(&self) -> &EntropyProfile {
        &self.profile
    }

    pub fn thermal(&self) -> ThermalState {
        self.thermal
    }
}
