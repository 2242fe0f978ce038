use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::stats;
use crate::model::Snapshot;

/// Pearson coefficient magnitude below which humidity and pressure are
/// reported as uncorrelated.
pub const CORRELATION_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationLabel {
    /// Coefficient below -0.3.
    Inverse,
    /// Coefficient above +0.3.
    Direct,
    /// Coefficient within the threshold band.
    None,
    /// Fewer than two paired points, or a constant series.
    Undetermined,
}

impl std::fmt::Display for CorrelationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CorrelationLabel::Inverse => "inverse",
            CorrelationLabel::Direct => "direct",
            CorrelationLabel::None => "none",
            CorrelationLabel::Undetermined => "undetermined",
        })
    }
}

/// Mean and population variance of one observed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub mean: f64,
    pub variance: f64,
}

/// Correlation-oriented summary of humidity and pressure over a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternResult {
    /// `None` when no snapshot reported humidity.
    pub humidity: Option<FieldStats>,
    /// `None` when no snapshot reported pressure.
    pub pressure: Option<FieldStats>,
    pub correlation: CorrelationLabel,
    /// Snapshots per condition label, e.g. "Clouds" -> 12.
    pub condition_counts: BTreeMap<String, usize>,
    pub total_snapshots: usize,
}

/// Summarizes humidity/pressure behaviour over the given sequence.
///
/// Advisory output: this analyzer always degrades gracefully instead of
/// erroring. An empty or single-point sequence yields absent field stats
/// and an `Undetermined` correlation. The caller bounds the range through
/// repository filtering; no windowing happens here.
pub fn analyze_patterns(snapshots: &[Snapshot]) -> PatternResult {
    let humidities: Vec<f64> = snapshots
        .iter()
        .filter_map(|s| s.humidity_pct.map(f64::from))
        .collect();
    let pressures: Vec<f64> = snapshots
        .iter()
        .filter_map(|s| s.pressure_hpa.map(f64::from))
        .collect();

    // Correlation only pairs snapshots carrying both fields.
    let (paired_h, paired_p): (Vec<f64>, Vec<f64>) = snapshots
        .iter()
        .filter_map(|s| match (s.humidity_pct, s.pressure_hpa) {
            (Some(h), Some(p)) => Some((f64::from(h), f64::from(p))),
            _ => None,
        })
        .unzip();

    let correlation = match stats::pearson(&paired_h, &paired_p) {
        Some(r) if r < -CORRELATION_THRESHOLD => CorrelationLabel::Inverse,
        Some(r) if r > CORRELATION_THRESHOLD => CorrelationLabel::Direct,
        Some(_) => CorrelationLabel::None,
        None => CorrelationLabel::Undetermined,
    };

    let mut condition_counts: BTreeMap<String, usize> = BTreeMap::new();
    for snap in snapshots {
        if let Some(condition) = &snap.condition {
            *condition_counts.entry(condition.clone()).or_default() += 1;
        }
    }

    PatternResult {
        humidity: field_stats(&humidities),
        pressure: field_stats(&pressures),
        correlation,
        condition_counts,
        total_snapshots: snapshots.len(),
    }
}

fn field_stats(values: &[f64]) -> Option<FieldStats> {
    Some(FieldStats {
        mean: stats::mean(values)?,
        variance: stats::population_variance(values)?,
    })
}
