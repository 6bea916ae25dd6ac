//! Closed-form statistics over entropy windows.
//!
//! Variance and standard deviation are population statistics (divide by n).

use serde::{Deserialize, Serialize};

use super::types::Trend;

/// Slopes within this band are stable
pub const TREND_SLOPE_THRESHOLD: f64 = 0.01;
/// Number of most recent samples used for trend classification
pub const TREND_WINDOW: usize = 10;
/// Oscillation needs sign changes in more than this share of difference pairs
pub const OSCILLATION_RATIO: f64 = 0.6;
/// Assumed maximum reasonable std of first differences
pub const MAX_REASONABLE_VOLATILITY: f64 = 0.2;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// `values[i] - values[i-1]`
pub fn first_differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Ordinary least squares fit against the sample index, as `(slope, intercept)`
pub fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    let slope = num / den;
    (slope, y_mean - slope * x_mean)
}

/// True when consecutive first differences flip sign often enough
pub fn is_oscillating(values: &[f64]) -> bool {
    if values.len() < 5 {
        return false;
    }
    let diffs = first_differences(values);
    let pairs = diffs.len() - 1;
    let sign_changes = diffs.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    sign_changes as f64 > pairs as f64 * OSCILLATION_RATIO
}

/// Trend of the most recent [`TREND_WINDOW`] values
///
/// The slope decides stable/increasing/decreasing; oscillation overrides it.
pub fn classify_trend(values: &[f64]) -> Trend {
    let recent = &values[values.len().saturating_sub(TREND_WINDOW)..];
    if recent.len() < 2 {
        return Trend::Stable;
    }

    if is_oscillating(recent) {
        return Trend::Oscillating;
    }

    let (slope, _) = linear_fit(recent);
    if slope.abs() < TREND_SLOPE_THRESHOLD {
        Trend::Stable
    } else if slope > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    }
}

/// Std of first differences over the last `window` values, normalized to `[0, 1]`
///
/// Zero until a full window is available.
pub fn volatility_score(values: &[f64], window: usize) -> f64 {
    if window < 2 || values.len() < window {
        return 0.0;
    }
    let recent = &values[values.len() - window..];
    let volatility = std_dev(&first_differences(recent));
    (volatility / MAX_REASONABLE_VOLATILITY).clamp(0.0, 1.0)
}

/// Mean magnitude of second differences
pub fn mean_abs_acceleration(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    let second = first_differences(&first_differences(values));
    second.iter().map(|a| a.abs()).sum::<f64>() / second.len() as f64
}

/// Pearson correlation, `None` when either side has zero variance
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let (mean_a, mean_b) = (mean(a), mean(b));

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Welford accumulator over every value ever pushed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    pub count: u64,
    pub mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Population standard deviation
    pub fn std(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / self.count as f64).sqrt()
    }
}
