//! Date/time parsing utilities for envset
//!
//! Timestamps arriving from the environment are plain strings; these helpers
//! turn the common ISO 8601 shapes into `DateTime<Utc>`.

use crate::error::{Result, SettingsError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse ISO 8601 date/datetime strings
/// Supported formats:
/// - "2024-12-31" (date only, midnight UTC)
/// - "2024-12-31T23:59:59" (assumed UTC)
/// - "2024-12-31 23:59:59" (assumed UTC)
/// - "2024-12-31T23:59:59Z"
/// - "2024-12-31T23:59:59+02:00"
pub fn parse_iso_datetime(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(SettingsError::invalid_value(format!(
        "Invalid date format: '{}'. Expected ISO 8601 format (YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS, or YYYY-MM-DDTHH:MM:SSZ)",
        input
    )))
}

/// Format a DateTime for display
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_iso_datetime() {
        let result = parse_iso_datetime("2024-12-31").unwrap();
        assert_eq!(result.date_naive().to_string(), "2024-12-31");
        assert_eq!(result.hour(), 0);

        let result = parse_iso_datetime("2024-12-31T23:59:59Z").unwrap();
        assert_eq!(result.year(), 2024);
        assert_eq!(result.month(), 12);
        assert_eq!(result.day(), 31);

        let result = parse_iso_datetime("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(result.hour(), 10);

        let result = parse_iso_datetime("2024-06-01 08:30:00").unwrap();
        assert_eq!(result, Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_iso_datetime("invalid").is_err());
        assert!(parse_iso_datetime("2024-13-01").is_err());
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_datetime(dt), "2024-01-02 03:04:05 UTC");
    }
}
