//! Wire formats for calendar dates and time slots.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::{CONSULTATION_TIME_FORMAT, DATE_FORMAT, TIME_SLOT_FORMAT};

/// Accepted consultation timestamp layouts besides RFC 3339
const LOCAL_TIME_FORMATS: [&str; 3] =
    [CONSULTATION_TIME_FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse a `YYYY-MM-DD` calendar date. Impossible dates (2025-02-30) fail.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parse an `HH:MM` slot.
pub fn parse_time_slot(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_SLOT_FORMAT).ok()
}

/// Parse a consultation timestamp.
///
/// RFC 3339 values keep their wall time and drop the offset. A bare
/// `YYYY-MM-DD` means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }
    LOCAL_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| parse_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(CONSULTATION_TIME_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time_slot(slot: NaiveTime) -> String {
    slot.format(TIME_SLOT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-06-01"), NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("01/06/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_time_slot() {
        assert_eq!(parse_time_slot("10:00"), NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(parse_time_slot("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_time_slot("24:00"), None);
        assert_eq!(parse_time_slot("ten"), None);
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 20)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap();
        assert_eq!(parse_timestamp("2025-04-20T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-20T14:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-20 14:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-20T14:30:00-03:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-04-20"),
            NaiveDate::from_ymd_opt(2025, 4, 20).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_timestamp("20/04/2025"), None);
        assert_eq!(parse_timestamp("2025-04-31T10:00:00"), None);
    }

    #[test]
    fn test_formats_are_stable() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let slot = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_date(date), "2025-06-01");
        assert_eq!(format_time_slot(slot), "09:05");
        assert_eq!(format_timestamp(date.and_time(slot)), "2025-06-01T09:05:00");
    }
}
