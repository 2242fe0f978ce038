//! Input checks applied at the edge, before any repository access.

use chrono::NaiveDate;

use crate::error::{AnalyticsError, Result};

/// Longest accepted location name.
pub const MAX_LOCATION_NAME_LEN: usize = 100;

/// Checks a location name: non-empty, at most 100 characters, and made of
/// letters, spaces, hyphens and apostrophes (covers "New York" and
/// "Martha's Vineyard"). Returns the trimmed name.
pub fn location_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AnalyticsError::InvalidInput("location name cannot be empty".into()));
    }
    if name.chars().count() > MAX_LOCATION_NAME_LEN {
        return Err(AnalyticsError::InvalidInput(format!(
            "location name must be at most {MAX_LOCATION_NAME_LEN} characters"
        )));
    }
    if !name.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'') {
        return Err(AnalyticsError::InvalidInput(format!(
            "location name '{name}' contains invalid characters"
        )));
    }
    Ok(name)
}

/// Parses a `YYYY-MM-DD` date string.
pub fn date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AnalyticsError::InvalidInput(format!(
            "invalid date '{raw}', expected YYYY-MM-DD (e.g. 2026-01-19)"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_and_punctuated_names() {
        assert_eq!(location_name("Tokyo").unwrap(), "Tokyo");
        assert_eq!(location_name("  New York ").unwrap(), "New York");
        assert_eq!(location_name("Saint-Denis").unwrap(), "Saint-Denis");
        assert_eq!(location_name("O'Brien").unwrap(), "O'Brien");
        assert_eq!(location_name("Zürich").unwrap(), "Zürich");
    }

    #[test]
    fn rejects_empty_and_overlong_names() {
        assert!(matches!(location_name("").unwrap_err(), AnalyticsError::InvalidInput(_)));
        assert!(matches!(location_name("   ").unwrap_err(), AnalyticsError::InvalidInput(_)));

        let long = "a".repeat(101);
        assert!(matches!(location_name(&long).unwrap_err(), AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn rejects_digits_and_symbols() {
        for bad in ["Tokyo1", "Oslo;drop", "a/b", "x_y"] {
            assert!(
                matches!(location_name(bad).unwrap_err(), AnalyticsError::InvalidInput(_)),
                "{bad}"
            );
        }
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(date("2026-01-19").unwrap(), NaiveDate::from_ymd_opt(2026, 1, 19).unwrap());
        for bad in ["19-01-2026", "2026/01/19", "yesterday", "2026-13-01"] {
            assert!(matches!(date(bad).unwrap_err(), AnalyticsError::InvalidInput(_)), "{bad}");
        }
    }
}
