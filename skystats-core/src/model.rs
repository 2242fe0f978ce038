use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered place snapshots are recorded against. Immutable once
/// created; snapshots reference it by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
}

/// One recorded weather observation.
///
/// `recorded_at` is UTC but NOT guaranteed to be monotonically
/// non-decreasing per location; retry-driven refetches from the upstream
/// provider can land out of order, so every consumer sorts explicitly.
/// Humidity, pressure and condition may be missing from an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: u64,
    pub location_id: u32,
    /// Degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity, percent (0..=100).
    pub humidity_pct: Option<u8>,
    /// Atmospheric pressure, hPa.
    pub pressure_hpa: Option<u32>,
    /// Short condition label from the provider, e.g. "Clouds".
    pub condition: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Calendar alignment for bucketed statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// UTC calendar date.
    Day,
    /// ISO week, Monday start.
    Week,
    /// Calendar (year, month).
    Month,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Largest permitted lookback for this granularity. Requests above the
    /// cap fail rather than being clamped.
    pub const fn lookback_cap(self) -> u32 {
        match self {
            Granularity::Day => 365,
            Granularity::Week => 52,
            Granularity::Month => 24,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn lookback_caps_match_documented_limits() {
        assert_eq!(Granularity::Day.lookback_cap(), 365);
        assert_eq!(Granularity::Week.lookback_cap(), 52);
        assert_eq!(Granularity::Month.lookback_cap(), 24);
    }

    #[test]
    fn snapshot_json_roundtrip_preserves_missing_fields() {
        let snap = Snapshot {
            id: 7,
            location_id: 1,
            temperature_c: -3.5,
            humidity_pct: None,
            pressure_hpa: Some(1013),
            condition: None,
            recorded_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.humidity_pct, None);
    }
}
