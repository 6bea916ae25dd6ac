//! Z-score anomaly detection over a bloom's full history

use super::stats;
use super::types::{AnomalyKind, AnomalySeverity, EntropyAnomaly, EntropySample};

/// Samples needed before anomalies are reported
pub const MIN_ANOMALY_SAMPLES: usize = 20;
/// |z| above which an anomaly is high severity
pub const HIGH_SEVERITY_Z: f64 = 3.5;

/// Flag samples whose |z| against the window mean and std exceeds `z_threshold`
///
/// Empty when fewer than [`MIN_ANOMALY_SAMPLES`] samples exist or the
/// window has zero spread.
pub fn detect_anomalies<'a, I>(samples: I, z_threshold: f64) -> Vec<EntropyAnomaly>
where
    I: IntoIterator<Item = &'a EntropySample>,
    I::IntoIter: Clone,
{
    let samples = samples.into_iter();
    let values: Vec<f64> = samples.clone().map(|s| s.entropy).collect();
    if values.len() < MIN_ANOMALY_SAMPLES {
        return Vec::new();
    }

    let mean = stats::mean(&values);
    let std = stats::std_dev(&values);
    if std == 0.0 {
        return Vec::new();
    }

    samples
        .filter_map(|sample| {
            let z_score = ((sample.entropy - mean) / std).abs();
            if z_score <= z_threshold {
                return None;
            }
            Some(EntropyAnomaly {
                timestamp: sample.timestamp,
                entropy: sample.entropy,
                z_score,
                severity: if z_score > HIGH_SEVERITY_Z {
                    AnomalySeverity::High
                } else {
                    AnomalySeverity::Medium
                },
                kind: if sample.entropy > mean { AnomalyKind::Spike } else { AnomalyKind::Drop },
                source: sample.source.clone(),
            })
        })
        .collect()
}
