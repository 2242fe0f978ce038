use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::model::{Granularity, Snapshot};

/// Identity of one calendar period. Buckets are keyed, not positional:
/// a missing day is simply absent from the output, never a zero entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{date}"),
            BucketKey::Week { year, week } => write!(f, "{year}-W{week:02}"),
            BucketKey::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

/// Summary of all snapshots falling in one calendar period. Ephemeral,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: BucketKey,
    /// First calendar date of the period.
    pub period_start: NaiveDate,
    /// Last calendar date of the period, inclusive.
    pub period_end: NaiveDate,
    pub count: usize,
    pub mean_temperature_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    /// Mean over snapshots that reported humidity; `None` if none did.
    pub mean_humidity_pct: Option<f64>,
    /// Mean over snapshots that reported pressure; `None` if none did.
    pub mean_pressure_hpa: Option<f64>,
}

/// Time bounds applied before bucketing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Everything the caller handed in.
    All,
    /// Trailing N periods ending at `now`, current partial period included.
    Lookback(u32),
    /// Inclusive timestamp range.
    Range(DateTime<Utc>, DateTime<Utc>),
}

/// Partitions snapshots into calendar-aligned buckets and summarizes each.
///
/// Input order does not matter: snapshots are stably sorted by
/// `recorded_at` first, ties keeping arrival order. Only periods holding
/// at least one snapshot are emitted, ascending by key; callers get a
/// sparse sequence, never padding. A lookback asking for more populated
/// periods than exist returns whatever is there.
pub fn bucketize(
    snapshots: &[Snapshot],
    granularity: Granularity,
    window: Window,
    now: DateTime<Utc>,
) -> Result<Vec<Bucket>> {
    let bounds = resolve_window(granularity, window, now)?;

    let mut sorted: Vec<&Snapshot> = snapshots
        .iter()
        .filter(|s| bounds.contains(s.recorded_at))
        .collect();
    sorted.sort_by_key(|s| s.recorded_at);

    let mut accs: BTreeMap<BucketKey, Accumulator> = BTreeMap::new();
    for snap in sorted {
        let key = bucket_key(snap.recorded_at.date_naive(), granularity);
        accs.entry(key).or_default().add(snap);
    }

    Ok(accs
        .into_iter()
        .map(|(key, acc)| acc.finish(key))
        .collect())
}

/// The bucket a UTC calendar date falls into.
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> BucketKey {
    match granularity {
        Granularity::Day => BucketKey::Day(date),
        Granularity::Week => {
            let iso = date.iso_week();
            BucketKey::Week { year: iso.year(), week: iso.week() }
        }
        Granularity::Month => BucketKey::Month { year: date.year(), month: date.month() },
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Bounds {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at <= e)
    }
}

fn resolve_window(
    granularity: Granularity,
    window: Window,
    now: DateTime<Utc>,
) -> Result<Bounds> {
    match window {
        Window::All => Ok(Bounds { start: None, end: None }),
        Window::Range(start, end) => {
            if end < start {
                return Err(AnalyticsError::InvalidInput(format!(
                    "window end {end} precedes start {start}"
                )));
            }
            Ok(Bounds { start: Some(start), end: Some(end) })
        }
        Window::Lookback(periods) => {
            if periods == 0 {
                return Err(AnalyticsError::InvalidInput(
                    "lookback must be at least 1 period".into(),
                ));
            }
            let cap = granularity.lookback_cap();
            if periods > cap {
                return Err(AnalyticsError::OutOfRange(format!(
                    "{granularity} lookback must be at most {cap}, got {periods}"
                )));
            }
            let start_date = lookback_start(now.date_naive(), granularity, periods);
            let start = start_date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .ok_or_else(|| anyhow::anyhow!("invalid lookback start date {start_date}"))?;
            Ok(Bounds { start: Some(start), end: Some(now) })
        }
    }
}

/// First calendar date of the oldest period in an N-period lookback ending
/// today. The current partial period counts as one of the N.
fn lookback_start(today: NaiveDate, granularity: Granularity, periods: u32) -> NaiveDate {
    let back = periods - 1;
    match granularity {
        Granularity::Day => today - Duration::days(i64::from(back)),
        Granularity::Week => {
            let monday =
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            monday - Duration::weeks(i64::from(back))
        }
        Granularity::Month => {
            let first = today.with_day(1).unwrap_or(today);
            first.checked_sub_months(Months::new(back)).unwrap_or(first)
        }
    }
}

fn period_bounds(key: BucketKey) -> (NaiveDate, NaiveDate) {
    match key {
        BucketKey::Day(date) => (date, date),
        BucketKey::Week { year, week } => {
            let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
                .unwrap_or(NaiveDate::MIN);
            (start, start + Duration::days(6))
        }
        BucketKey::Month { year, month } => {
            let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
            let next = start.checked_add_months(Months::new(1)).unwrap_or(start);
            (start, next - Duration::days(1))
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    temp_sum: f64,
    temp_min: f64,
    temp_max: f64,
    humidity_sum: f64,
    humidity_count: usize,
    pressure_sum: f64,
    pressure_count: usize,
}

impl Accumulator {
    fn add(&mut self, snap: &Snapshot) {
        if self.count == 0 {
            self.temp_min = snap.temperature_c;
            self.temp_max = snap.temperature_c;
        } else {
            self.temp_min = self.temp_min.min(snap.temperature_c);
            self.temp_max = self.temp_max.max(snap.temperature_c);
        }
        self.count += 1;
        self.temp_sum += snap.temperature_c;

        if let Some(h) = snap.humidity_pct {
            self.humidity_sum += f64::from(h);
            self.humidity_count += 1;
        }
        if let Some(p) = snap.pressure_hpa {
            self.pressure_sum += f64::from(p);
            self.pressure_count += 1;
        }
    }

    fn finish(self, key: BucketKey) -> Bucket {
        let (period_start, period_end) = period_bounds(key);
        Bucket {
            key,
            period_start,
            period_end,
            count: self.count,
            mean_temperature_c: self.temp_sum / self.count as f64,
            min_temperature_c: self.temp_min,
            max_temperature_c: self.temp_max,
            mean_humidity_pct: (self.humidity_count > 0)
                .then(|| self.humidity_sum / self.humidity_count as f64),
            mean_pressure_hpa: (self.pressure_count > 0)
                .then(|| self.pressure_sum / self.pressure_count as f64),
        }
    }
}
