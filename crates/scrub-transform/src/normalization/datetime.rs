//! Timestamp parsing.
//!
//! Raw sources mix ISO 8601, US month-first dates, `15-Jan-2024` style
//! dates and Unix epoch seconds. Everything parseable becomes a
//! `Value::Timestamp`; anything else becomes `Null` and the row is kept.
//! Ambiguous slash dates (`03/04/2024`) are read month-first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use scrub_model::{Value, is_placeholder};

/// Normalize a raw value into a timestamp or `Null`.
pub fn normalize_timestamp(value: &Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::Timestamp(*ts),
        Value::Number(seconds) => from_epoch_seconds(*seconds).map_or(Value::Null, Value::from),
        Value::Text(text) => parse_timestamp(text).map_or(Value::Null, Value::from),
        Value::Null => Value::Null,
    }
}

/// Parse a textual timestamp.
///
/// Tries, in order: epoch seconds, RFC 3339 (offset converted to UTC),
/// full datetime formats, then date-only formats at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return None;
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return from_epoch_seconds(seconds);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    let without_zulu = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    try_parse_datetime(without_zulu)
        .or_else(|| try_parse_date(without_zulu).map(|d| d.and_time(NaiveTime::MIN)))
}

fn from_epoch_seconds(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)).map(|dt| dt.naive_utc())
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%d-%b-%Y %H:%M",
        "%d/%b/%Y:%H:%M:%S", // access-log style
        "%b %d %Y %H:%M:%S",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    None
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",  // US: 01/15/2024
        "%m-%d-%Y",  // 01-15-2024
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
        "%Y-%b-%d",  // 2024-Jan-15
    ];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_iso_variants() {
        let expected = ts(2024, 1, 15, 10, 30, 0);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_month_first_and_named_months() {
        assert_eq!(
            parse_timestamp("03/04/2024 08:15"),
            Some(ts(2024, 3, 4, 8, 15, 0))
        );
        assert_eq!(
            parse_timestamp("15-Jan-2024 10:30:00"),
            Some(ts(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(parse_timestamp("01/15/2024"), Some(ts(2024, 1, 15, 0, 0, 0)));
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(
            parse_timestamp("1705314600.0"),
            Some(ts(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            normalize_timestamp(&Value::from(1_705_314_600.0)),
            Value::from(ts(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_unparseable_becomes_null() {
        assert!(normalize_timestamp(&"INVALID_TIME".into()).is_null());
        assert!(normalize_timestamp(&"last week".into()).is_null());
        assert!(normalize_timestamp(&"N/A".into()).is_null());
        assert!(normalize_timestamp(&Value::Null).is_null());
    }

    #[test]
    fn test_timestamps_pass_through() {
        let value = Value::from(ts(2023, 6, 1, 0, 0, 0));
        assert_eq!(normalize_timestamp(&value), value);
    }
}
