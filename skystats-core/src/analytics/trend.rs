use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::bucketize::{Bucket, Window, bucketize};
use crate::analytics::stats;
use crate::error::{AnalyticsError, Result};
use crate::model::{Granularity, Snapshot};

/// Slope beyond which a trend stops being "stable", in °C per day bucket.
/// Fixed design constant, never inferred from the data.
pub const STABLE_SLOPE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
        })
    }
}

/// Outcome of a trend analysis over daily average temperatures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub buckets: Vec<Bucket>,
    pub direction: TrendDirection,
    /// Raw regression slope, °C per day bucket, signed.
    pub slope: f64,
    /// Mean temperature of the oldest populated day, for interpretability.
    pub first_avg: f64,
    /// Mean temperature of the newest populated day.
    pub last_avg: f64,
}

/// Classifies the directional temperature trend over a trailing day window.
///
/// Daily buckets come from [`bucketize`]; the slope is an ordinary
/// least-squares fit of bucket mean temperature against bucket ordinal
/// index, so gaps in the history do not stretch the fit. Fewer than two
/// populated days is an `InsufficientData` error: a single point has no
/// direction, and trend is the primary analytic, so it fails loudly
/// rather than degrading.
pub fn analyze_trend(
    snapshots: &[Snapshot],
    days: u32,
    now: DateTime<Utc>,
) -> Result<TrendResult> {
    let buckets = bucketize(snapshots, Granularity::Day, Window::Lookback(days), now)?;

    if buckets.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "trend needs at least 2 populated days, found {}",
            buckets.len()
        )));
    }

    let means: Vec<f64> = buckets.iter().map(|b| b.mean_temperature_c).collect();
    let slope = stats::ols_slope(&means)
        .ok_or_else(|| AnalyticsError::InsufficientData("trend slope undefined".into()))?;

    let direction = if slope > STABLE_SLOPE_THRESHOLD {
        TrendDirection::Rising
    } else if slope < -STABLE_SLOPE_THRESHOLD {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };

    let first_avg = means[0];
    let last_avg = means[means.len() - 1];

    Ok(TrendResult { buckets, direction, slope, first_avg, last_avg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    /// One snapshot per day ending today, oldest first.
    fn daily_series(temps: &[f64]) -> Vec<Snapshot> {
        let n = temps.len() as i64;
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| Snapshot {
                id: i as u64,
                location_id: 1,
                temperature_c: t,
                humidity_pct: Some(55),
                pressure_hpa: Some(1010),
                condition: None,
                recorded_at: now() - Duration::days(n - 1 - i as i64),
            })
            .collect()
    }

    #[test]
    fn strictly_increasing_series_is_rising() {
        // Tokyo scenario: days 1..10, temperatures 10..19.
        let temps: Vec<f64> = (10..20).map(f64::from).collect();
        let result = analyze_trend(&daily_series(&temps), 10, now()).unwrap();

        assert_eq!(result.direction, TrendDirection::Rising);
        assert_eq!(result.first_avg, 10.0);
        assert_eq!(result.last_avg, 19.0);
        assert!((result.slope - 1.0).abs() < 1e-9);
        assert_eq!(result.buckets.len(), 10);
    }

    #[test]
    fn strictly_decreasing_series_is_falling() {
        let temps: Vec<f64> = (0..8).map(|i| 20.0 - f64::from(i)).collect();
        let result = analyze_trend(&daily_series(&temps), 8, now()).unwrap();
        assert_eq!(result.direction, TrendDirection::Falling);
        assert!(result.slope < 0.0);
    }

    #[test]
    fn constant_series_is_stable() {
        let result = analyze_trend(&daily_series(&[15.0; 5]), 5, now()).unwrap();
        assert_eq!(result.direction, TrendDirection::Stable);
        assert_eq!(result.slope, 0.0);
    }

    #[test]
    fn slope_within_threshold_is_stable() {
        // 0.05 °C/day drift stays under the 0.1 threshold.
        let temps: Vec<f64> = (0..10).map(|i| 15.0 + 0.05 * f64::from(i)).collect();
        let result = analyze_trend(&daily_series(&temps), 10, now()).unwrap();
        assert_eq!(result.direction, TrendDirection::Stable);
    }

    #[test]
    fn fewer_than_two_days_is_insufficient() {
        let err = analyze_trend(&[], 7, now()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));

        let err = analyze_trend(&daily_series(&[12.0]), 7, now()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }

    #[test]
    fn two_same_day_snapshots_are_still_one_point() {
        let base = now();
        let mut snaps = daily_series(&[12.0]);
        snaps.push(Snapshot {
            id: 99,
            location_id: 1,
            temperature_c: 14.0,
            humidity_pct: None,
            pressure_hpa: None,
            condition: None,
            recorded_at: base - Duration::hours(2),
        });

        let err = analyze_trend(&snaps, 7, base).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }

    #[test]
    fn lookback_cap_propagates() {
        let err = analyze_trend(&daily_series(&[1.0, 2.0]), 400, now()).unwrap_err();
        assert!(matches!(err, AnalyticsError::OutOfRange(_)));
    }

    #[test]
    fn sparse_days_regress_on_ordinal_index() {
        // Snapshots on days -9, -4 and 0: three buckets, indexes 0..3,
        // rising regardless of the calendar gaps.
        let base = now();
        let snaps: Vec<Snapshot> = [(9_i64, 10.0), (4, 14.0), (0, 18.0)]
            .iter()
            .map(|&(back, t)| Snapshot {
                id: back as u64,
                location_id: 1,
                temperature_c: t,
                humidity_pct: None,
                pressure_hpa: None,
                condition: None,
                recorded_at: base - Duration::days(back),
            })
            .collect();

        let result = analyze_trend(&snaps, 10, base).unwrap();
        assert_eq!(result.buckets.len(), 3);
        assert_eq!(result.direction, TrendDirection::Rising);
        assert!((result.slope - 4.0).abs() < 1e-9);
    }
}
