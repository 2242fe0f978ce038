use serde::Serialize;

use crate::analytics::stats;
use crate::error::{AnalyticsError, Result};
use crate::model::{Location, Snapshot};

/// Most locations a single comparison may rank.
pub const MAX_COMPARISON_SUBJECTS: usize = 10;

/// Statistic a comparison ranks locations by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    MeanTemperature,
    MeanHumidity,
    MeanPressure,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::MeanTemperature => "mean_temperature",
            Metric::MeanHumidity => "mean_humidity",
            Metric::MeanPressure => "mean_pressure",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean_temperature" | "temperature" => Ok(Metric::MeanTemperature),
            "mean_humidity" | "humidity" => Ok(Metric::MeanHumidity),
            "mean_pressure" | "pressure" => Ok(Metric::MeanPressure),
            other => Err(AnalyticsError::InvalidInput(format!(
                "unknown metric '{other}', expected one of: \
                 mean_temperature, mean_humidity, mean_pressure"
            ))),
        }
    }
}

/// One ranked location in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub location: Location,
    /// 1-based position after ranking.
    pub rank: usize,
    /// Metric value; `None` when the location had no usable data in the
    /// requested range. Such a location is still listed, ranked last.
    pub value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub snapshot_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub metric: Metric,
    pub entries: Vec<ComparisonEntry>,
}

/// Ranks locations by one statistic computed over each location's own
/// snapshot sequence.
///
/// Ordering is descending by value; a location without data keeps its
/// place in the output with `value: None`, after every location that has
/// one. Ties break by location name ascending so results are
/// deterministic.
pub fn compare(
    subjects: Vec<(Location, Vec<Snapshot>)>,
    metric: Metric,
) -> Result<ComparisonResult> {
    if subjects.len() < 2 {
        return Err(AnalyticsError::InvalidInput(format!(
            "comparison needs at least 2 locations, got {}",
            subjects.len()
        )));
    }
    if subjects.len() > MAX_COMPARISON_SUBJECTS {
        return Err(AnalyticsError::OutOfRange(format!(
            "comparison accepts at most {MAX_COMPARISON_SUBJECTS} locations, got {}",
            subjects.len()
        )));
    }

    let mut entries: Vec<ComparisonEntry> = subjects
        .into_iter()
        .map(|(location, snapshots)| {
            let values = metric_values(&snapshots, metric);
            ComparisonEntry {
                location,
                rank: 0,
                value: stats::mean(&values),
                min: values.iter().copied().reduce(f64::min),
                max: values.iter().copied().reduce(f64::max),
                snapshot_count: snapshots.len(),
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.location.name.cmp(&b.location.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.location.name.cmp(&b.location.name),
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    Ok(ComparisonResult { metric, entries })
}

fn metric_values(snapshots: &[Snapshot], metric: Metric) -> Vec<f64> {
    match metric {
        Metric::MeanTemperature => snapshots.iter().map(|s| s.temperature_c).collect(),
        Metric::MeanHumidity => {
            snapshots.iter().filter_map(|s| s.humidity_pct.map(f64::from)).collect()
        }
        Metric::MeanPressure => {
            snapshots.iter().filter_map(|s| s.pressure_hpa.map(f64::from)).collect()
        }
    }
}
