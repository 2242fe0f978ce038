use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::{
    self, Bucket, ComparisonResult, Metric, PatternResult, TrendResult, Window,
};
use crate::error::{AnalyticsError, Result};
use crate::model::{Granularity, Location, Snapshot};
use crate::repository::SnapshotRepository;

/// Bounded-range export of raw snapshots for one location.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub location: Location,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_records: usize,
    pub records: Vec<Snapshot>,
}

/// Entry points for the analytic operations, one per user-facing
/// question.
///
/// The service resolves a location name through the repository
/// (exact-match, `NotFound` on a miss), pulls that location's snapshot
/// history, and hands it to the engine. Parameter validation that needs
/// no data (comparison arity, inverted ranges, lookback caps) fails
/// before the repository is touched. Repository failures pass through
/// unchanged.
#[derive(Debug)]
pub struct AnalyticsService<'a> {
    repo: &'a dyn SnapshotRepository,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(repo: &'a dyn SnapshotRepository) -> Self {
        Self { repo }
    }

    /// Per-day temperature summaries. `days: None` means full history.
    pub async fn daily_averages(&self, name: &str, days: Option<u32>) -> Result<Vec<Bucket>> {
        let window = match days {
            Some(n) => Window::Lookback(n),
            None => Window::All,
        };
        let (_, snapshots) = self.location_history(name).await?;
        analytics::bucketize(&snapshots, Granularity::Day, window, Utc::now())
    }

    /// Per-ISO-week temperature summaries over a trailing window.
    pub async fn weekly_averages(&self, name: &str, weeks: u32) -> Result<Vec<Bucket>> {
        let (_, snapshots) = self.location_history(name).await?;
        analytics::bucketize(
            &snapshots,
            Granularity::Week,
            Window::Lookback(weeks),
            Utc::now(),
        )
    }

    /// Per-calendar-month temperature summaries over a trailing window.
    pub async fn monthly_averages(&self, name: &str, months: u32) -> Result<Vec<Bucket>> {
        let (_, snapshots) = self.location_history(name).await?;
        analytics::bucketize(
            &snapshots,
            Granularity::Month,
            Window::Lookback(months),
            Utc::now(),
        )
    }

    /// Directional temperature trend over a trailing day window.
    pub async fn trend(&self, name: &str, days: u32) -> Result<TrendResult> {
        let (_, snapshots) = self.location_history(name).await?;
        analytics::analyze_trend(&snapshots, days, Utc::now())
    }

    /// Humidity/pressure pattern summary over the full history.
    pub async fn patterns(&self, name: &str) -> Result<PatternResult> {
        let (_, snapshots) = self.location_history(name).await?;
        Ok(analytics::analyze_patterns(&snapshots))
    }

    /// Ranks the named locations by one statistic. Every name must
    /// resolve; arity is checked before any lookup.
    pub async fn compare(&self, names: &[String], metric: Metric) -> Result<ComparisonResult> {
        if names.len() < 2 {
            return Err(AnalyticsError::InvalidInput(format!(
                "comparison needs at least 2 locations, got {}",
                names.len()
            )));
        }
        if names.len() > analytics::compare::MAX_COMPARISON_SUBJECTS {
            return Err(AnalyticsError::OutOfRange(format!(
                "comparison accepts at most {} locations, got {}",
                analytics::compare::MAX_COMPARISON_SUBJECTS,
                names.len()
            )));
        }

        let mut subjects = Vec::with_capacity(names.len());
        for name in names {
            subjects.push(self.location_history(name).await?);
        }
        analytics::compare(subjects, metric)
    }

    /// Raw snapshot export over an inclusive date range.
    pub async fn export(
        &self,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<ExportReport> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(AnalyticsError::InvalidInput(format!(
                "end date {end} precedes start date {start}"
            )));
        }

        let (location, snapshots) = self.location_history(name).await?;
        let records = analytics::export(&snapshots, start_date, end_date)?;
        Ok(ExportReport {
            location,
            start_date,
            end_date,
            total_records: records.len(),
            records,
        })
    }

    async fn location_history(&self, name: &str) -> Result<(Location, Vec<Snapshot>)> {
        let location = self
            .repo
            .resolve_location(name)
            .await?
            .ok_or_else(|| AnalyticsError::NotFound(format!("location '{name}'")))?;
        let snapshots = self.repo.get_snapshots(location.id, None, None).await?;
        Ok((location, snapshots))
    }
}
