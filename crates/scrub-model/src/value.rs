//! Scalar cell values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Canonical text form for timestamps in exports and identity keys.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Tokens that stand in for "no value" in raw sources (compared trimmed and
/// case-insensitively).
pub const PLACEHOLDER_TOKENS: &[&str] = &["", "n/a", "none", "null", "nan", "unknown"];

/// Returns true when `raw` is a placeholder sentinel rather than data.
pub fn is_placeholder(raw: &str) -> bool {
    let folded = raw.trim().to_lowercase();
    PLACEHOLDER_TOKENS.contains(&folded.as_str())
}

/// A single field value. No nested structures.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, or text that is a placeholder sentinel.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => is_placeholder(text),
            Value::Number(number) => number.is_nan(),
            Value::Timestamp(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Numeric view of the value, coercing numeric text.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) if !number.is_nan() => Some(*number),
            Value::Text(text) => text.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Type-tagged key used for identity comparisons, so that the text `"1"`
    /// and the number `1` stay distinct while two nulls compare equal.
    pub fn identity_key(&self) -> String {
        match self {
            Value::Null => "null:".to_string(),
            Value::Text(text) => format!("text:{text}"),
            Value::Number(number) => format!("num:{number}"),
            Value::Timestamp(ts) => format!("ts:{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(text) => f.write_str(text),
            Value::Number(number) => write!(f, "{number}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Number(number) if is_whole(*number) => serializer.serialize_i64(*number as i64),
            Value::Number(number) => serializer.serialize_f64(*number),
            Value::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

fn is_whole(number: f64) -> bool {
    number.is_finite() && number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn placeholders_are_case_insensitive() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("  N/A "));
        assert!(is_placeholder("None"));
        assert!(is_placeholder("UNKNOWN"));
        assert!(!is_placeholder("Gold"));
    }

    #[test]
    fn identity_keys_keep_types_apart() {
        assert_ne!(Value::from("1").identity_key(), Value::from(1.0).identity_key());
        assert_eq!(Value::Null.identity_key(), Value::Null.identity_key());
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let json = serde_json::to_string(&vec![
            Value::from(1042.0),
            Value::from(3.5),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, "[1042,3.5,null]");
    }

    #[test]
    fn timestamps_display_in_iso_form() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(Value::from(ts).to_string(), "2024-01-15T10:30:00");
    }

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(Value::from(" 42 ").to_number(), Some(42.0));
        assert_eq!(Value::from("N/A").to_number(), None);
        assert_eq!(Value::Null.to_number(), None);
    }
}
