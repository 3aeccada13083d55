use chrono::{NaiveDate, NaiveDateTime};

use super::model::RecordError;

/// NASA calendar-date format used by the CAD API, e.g. `1900-Jan-01 12:00`.
pub const CD_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Display / serialization format. Drops seconds, which the source never has.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a NASA-formatted calendar date/time (UTC) into a `NaiveDateTime`.
pub fn cd_to_datetime(calendar_date: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(calendar_date.trim(), CD_FORMAT).map_err(|_| {
        RecordError::InvalidDate {
            value: calendar_date.to_string(),
        }
    })
}

/// Format a date/time the way it appears in reports: `YYYY-MM-DD hh:mm`.
pub fn datetime_to_str(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Parse a date/time already in display format (`1995-01-01 12:00`).
pub fn parse_display_datetime(s: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(s.trim(), DISPLAY_FORMAT).map_err(|_| RecordError::InvalidDate {
        value: s.to_string(),
    })
}

/// Parse a plain `YYYY-MM-DD` date, as accepted by the query criteria.
pub fn parse_date(s: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| RecordError::InvalidDate {
        value: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_cd_to_datetime() {
        let dt = cd_to_datetime("1900-Jan-01 00:11").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1900, 1, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 11, 0));

        let dt = cd_to_datetime("2020-Dec-31 23:59").unwrap();
        assert_eq!(datetime_to_str(&dt), "2020-12-31 23:59");
    }

    #[test]
    fn test_cd_to_datetime_rejects_garbage() {
        assert!(cd_to_datetime("").is_err());
        assert!(cd_to_datetime("2020-13-01 00:00").is_err());
        assert!(cd_to_datetime("yesterday").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let dt = parse_display_datetime("1995-01-01 12:00").unwrap();
        assert_eq!(datetime_to_str(&dt), "1995-01-01 12:00");
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2020-01-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(parse_date("2020-Jan-01").is_err());
    }
}
