use chrono::NaiveDate;

use crate::error::{AnalyticsError, Result};
use crate::model::Snapshot;

/// Projects a snapshot sequence into an ordered, bounded-range record
/// list.
///
/// Bounds are inclusive UTC calendar dates applied to `recorded_at`;
/// either side may be open. Output is stably sorted ascending by
/// timestamp regardless of input order. An empty window is a valid,
/// empty result, not an error.
pub fn export(
    snapshots: &[Snapshot],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<Snapshot>> {
    if let (Some(start), Some(end)) = (start_date, end_date)
        && end < start
    {
        return Err(AnalyticsError::InvalidInput(format!(
            "end date {end} precedes start date {start}"
        )));
    }

    let mut records: Vec<Snapshot> = snapshots
        .iter()
        .filter(|s| {
            let date = s.recorded_at.date_naive();
            start_date.is_none_or(|start| date >= start)
                && end_date.is_none_or(|end| date <= end)
        })
        .cloned()
        .collect();
    records.sort_by_key(|s| s.recorded_at);

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, d, h, 0, 0).unwrap()
    }

    fn snap(id: u64, recorded_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            id,
            location_id: 1,
            temperature_c: 20.0,
            humidity_pct: None,
            pressure_hpa: None,
            condition: None,
            recorded_at,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    #[test]
    fn output_is_sorted_regardless_of_input_order() {
        let snaps = vec![snap(3, at(12, 0)), snap(1, at(10, 0)), snap(2, at(11, 0))];

        let records = export(&snaps, None, None).unwrap();
        let ids: Vec<u64> = records.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2, 3]);

        let reversed: Vec<Snapshot> = snaps.iter().rev().cloned().collect();
        assert_eq!(export(&reversed, None, None).unwrap(), records);
    }

    #[test]
    fn bounds_are_inclusive_calendar_dates() {
        let snaps = vec![
            snap(1, at(9, 23)),
            snap(2, at(10, 0)),
            snap(3, at(12, 23)),
            snap(4, at(13, 0)),
        ];

        let records = export(&snaps, Some(date(10)), Some(date(12))).unwrap();
        let ids: Vec<u64> = records.iter().map(|s| s.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn open_sided_bounds_work() {
        let snaps = vec![snap(1, at(5, 0)), snap(2, at(20, 0))];

        let from = export(&snaps, Some(date(10)), None).unwrap();
        assert_eq!(from.len(), 1);
        assert_eq!(from[0].id, 2);

        let until = export(&snaps, None, Some(date(10))).unwrap();
        assert_eq!(until.len(), 1);
        assert_eq!(until[0].id, 1);
    }

    #[test]
    fn inverted_range_is_invalid_input() {
        let err = export(&[], Some(date(12)), Some(date(10))).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn empty_window_is_an_empty_result_not_an_error() {
        let snaps = vec![snap(1, at(5, 0))];
        let records = export(&snaps, Some(date(20)), Some(date(25))).unwrap();
        assert!(records.is_empty());
    }
}
