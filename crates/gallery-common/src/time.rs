//! Timestamp handling for dictionary `createdAt` values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A `createdAt` value as it appears in a dictionary file.
///
/// Editors write either an ISO 8601 string or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Millis(i64),
    Text(String),
}

impl CreatedAt {
    /// Interpret the value, returning `None` when it cannot be understood.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CreatedAt::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            CreatedAt::Text(s) => parse_timestamp(s).ok(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

/// Parse an ISO 8601 timestamp, a naive datetime (assumed UTC) or a bare date.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601() {
        let dt = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2023-06-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_created_at_forms() {
        let text: CreatedAt = serde_json::from_str(r#""2024-03-10""#).unwrap();
        assert_eq!(text.to_datetime().unwrap().month(), 3);

        let millis: CreatedAt = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(millis.to_datetime().unwrap().year(), 2023);

        let junk = CreatedAt::Text("last spring".to_string());
        assert!(junk.to_datetime().is_none());
    }
}
