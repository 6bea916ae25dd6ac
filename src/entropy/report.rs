//! Stability reports, risk factors, recommendations, and phase portraits

use serde::{Deserialize, Serialize};

use super::stats;
use super::types::{EntropyProfile, EntropySample, ThermalState, Trend};

/// Window of most recent samples summarized in `recent_behavior`
pub const RECENT_WINDOW: usize = 20;
/// Chaos score above which a report carries the high-priority recommendation
pub const HIGH_PRIORITY_CHAOS: f64 = 0.8;
/// Chaos score above which a bloom is assessed critical
pub const CRITICAL_CHAOS: f64 = 0.9;
/// More anomalies than this count as frequent
pub const FREQUENT_ANOMALIES: usize = 3;

/// Categorical stability label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityLevel {
    HighlyStable,
    Stable,
    ModeratelyStable,
    Unstable,
    HighlyUnstable,
    /// Chaos score above 0.9, regardless of volatility
    Critical,
}

impl StabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityLevel::HighlyStable => "highly_stable",
            StabilityLevel::Stable => "stable",
            StabilityLevel::ModeratelyStable => "moderately_stable",
            StabilityLevel::Unstable => "unstable",
            StabilityLevel::HighlyUnstable => "highly_unstable",
            StabilityLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label a profile by volatility score and standard deviation
pub fn assess_stability(profile: &EntropyProfile, chaos_score: Option<f64>) -> StabilityLevel {
    let volatility = profile.volatility_score;
    if chaos_score.is_some_and(|c| c > CRITICAL_CHAOS) {
        StabilityLevel::Critical
    } else if volatility < 0.2 && profile.std_dev < 0.1 {
        StabilityLevel::HighlyStable
    } else if volatility < 0.4 && profile.std_dev < 0.2 {
        StabilityLevel::Stable
    } else if volatility < 0.6 {
        StabilityLevel::ModeratelyStable
    } else if volatility < 0.8 {
        StabilityLevel::Unstable
    } else {
        StabilityLevel::HighlyUnstable
    }
}

/// Conditions that raise a bloom's risk of disorderly behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Mean entropy above 0.8
    HighBaselineEntropy,
    /// Volatility score above 0.7
    ExtremeVolatility,
    OscillatingPattern,
    /// Maximum entropy above 0.95
    NearMaximumEntropy,
    /// Chaos score above 0.9
    CriticalChaosRisk,
    CurrentlyHot,
    /// More than three anomalies in the window
    FrequentAnomalies,
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskFactor::HighBaselineEntropy => "high_baseline_entropy",
            RiskFactor::ExtremeVolatility => "extreme_volatility",
            RiskFactor::OscillatingPattern => "oscillating_pattern",
            RiskFactor::NearMaximumEntropy => "near_maximum_entropy",
            RiskFactor::CriticalChaosRisk => "critical_chaos_risk",
            RiskFactor::CurrentlyHot => "currently_hot",
            RiskFactor::FrequentAnomalies => "frequent_anomalies",
        };
        f.write_str(name)
    }
}

pub fn risk_factors(
    profile: &EntropyProfile,
    thermal: ThermalState,
    chaos_score: Option<f64>,
    anomaly_count: usize,
) -> Vec<RiskFactor> {
    let mut risks = Vec::new();
    if profile.mean > 0.8 {
        risks.push(RiskFactor::HighBaselineEntropy);
    }
    if profile.volatility_score > 0.7 {
        risks.push(RiskFactor::ExtremeVolatility);
    }
    if profile.trend == Trend::Oscillating {
        risks.push(RiskFactor::OscillatingPattern);
    }
    if profile.max > 0.95 {
        risks.push(RiskFactor::NearMaximumEntropy);
    }
    if chaos_score.is_some_and(|c| c > CRITICAL_CHAOS) {
        risks.push(RiskFactor::CriticalChaosRisk);
    } else if thermal == ThermalState::Hot {
        risks.push(RiskFactor::CurrentlyHot);
    }
    if anomaly_count > FREQUENT_ANOMALIES {
        risks.push(RiskFactor::FrequentAnomalies);
    }
    risks
}

/// Stabilization advice driven by the same thresholds as the risk factors
pub fn recommendations(profile: &EntropyProfile, chaos_score: Option<f64>) -> Vec<String> {
    let chaos = chaos_score.unwrap_or(0.0);
    let mut advice = Vec::new();

    if chaos > CRITICAL_CHAOS {
        advice.push("CRITICAL: Immediate emergency stabilization required");
    }
    if profile.volatility_score > 0.7 {
        advice.push("Apply entropy dampening to reduce volatility");
    }
    if profile.mean > 0.8 {
        advice.push("Reduce baseline entropy through cooling cycles");
    }
    match profile.trend {
        Trend::Increasing => {
            advice.push("Monitor for entropy cascade - consider early intervention");
        }
        Trend::Oscillating => {
            advice.push("Stabilize oscillations with phase-locked reblooming");
        }
        Trend::Stable | Trend::Decreasing => {}
    }
    if chaos > HIGH_PRIORITY_CHAOS {
        advice.push("HIGH PRIORITY: Immediate stabilization recommended");
    }

    advice.into_iter().map(String::from).collect()
}

/// Summary of the most recent samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBehavior {
    pub window: usize,
    pub mean: f64,
    /// Direction from the first to the last sample of the window
    pub trend: Trend,
    /// Population std over the window
    pub volatility: f64,
    pub anomaly_count: usize,
}

impl RecentBehavior {
    pub fn from_values(values: &[f64], anomaly_count: usize) -> Self {
        let recent = &values[values.len().saturating_sub(RECENT_WINDOW)..];
        let trend = match (recent.first(), recent.last()) {
            (Some(first), Some(last)) if last > first => Trend::Increasing,
            (Some(first), Some(last)) if last < first => Trend::Decreasing,
            _ => Trend::Stable,
        };
        Self {
            window: recent.len(),
            mean: stats::mean(recent),
            trend,
            volatility: stats::std_dev(recent),
            anomaly_count,
        }
    }
}

/// Full stability picture of one bloom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub bloom_id: String,
    pub profile: EntropyProfile,
    pub thermal_state: ThermalState,
    /// Cached chaos score, `None` below the chaos sample minimum
    pub chaos_score: Option<f64>,
    pub stability_assessment: StabilityLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
    pub recent_behavior: RecentBehavior,
}

/// Entropy against its per-second rate of change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePortrait {
    /// Entropy from the second sample onward
    pub entropy: Vec<f64>,
    /// Change per second from the previous sample; 0 when timestamps coincide
    pub rate_of_change: Vec<f64>,
    pub trajectory_length: usize,
    /// Entropy range times rate range
    pub phase_space_area: f64,
}

impl PhasePortrait {
    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a EntropySample>,
    {
        let samples: Vec<&EntropySample> = samples.into_iter().collect();
        let mut entropy = Vec::with_capacity(samples.len().saturating_sub(1));
        let mut rate_of_change = Vec::with_capacity(samples.len().saturating_sub(1));

        for pair in samples.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let seconds = (next.timestamp - prev.timestamp).num_microseconds().unwrap_or(0) as f64
                / 1_000_000.0;
            let rate = if seconds > 0.0 { (next.entropy - prev.entropy) / seconds } else { 0.0 };
            entropy.push(next.entropy);
            rate_of_change.push(rate);
        }

        let phase_space_area = if entropy.len() < 3 {
            0.0
        } else {
            range(&entropy) * range(&rate_of_change)
        };

        Self { trajectory_length: rate_of_change.len(), entropy, rate_of_change, phase_space_area }
    }
}

fn range(values: &[f64]) -> f64 {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max - min
}
