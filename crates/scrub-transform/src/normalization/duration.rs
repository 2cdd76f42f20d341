//! Free-text durations.

use scrub_model::{Value, is_placeholder};

/// Minutes in one working day.
pub const WORKDAY_MINUTES: f64 = 480.0;

/// Convert `"2 hours"`, `"1 day"` or a bare number of minutes to minutes.
/// Non-positive and unparsable values become `Null`.
pub fn normalize_duration_minutes(value: &Value) -> Value {
    let minutes = match value {
        Value::Number(number) => Some(*number),
        Value::Text(text) => parse_minutes(text),
        _ => None,
    };
    match minutes {
        Some(minutes) if minutes > 0.0 && minutes.is_finite() => Value::Number(minutes),
        _ => Value::Null,
    }
}

fn parse_minutes(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return None;
    }
    let lower = trimmed.to_lowercase();
    let mut parts = lower.split_whitespace();
    let amount = parts.next()?.parse::<f64>().ok()?;
    let scale = match parts.next() {
        None => 1.0,
        Some(unit) if unit.starts_with("min") => 1.0,
        Some(unit) if unit.starts_with("hour") || unit.starts_with("hr") => 60.0,
        Some(unit) if unit.starts_with("day") => WORKDAY_MINUTES,
        Some(_) => return None,
    };
    Some(amount * scale)
}
