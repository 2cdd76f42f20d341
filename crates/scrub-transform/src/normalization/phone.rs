//! North American phone numbers.

use scrub_model::Value;

/// Numbers stored as JSON numbers have at most 11 digits.
const MAX_NUMERIC_PHONE: f64 = 1e11;

/// `NNN-NNN-NNNN` from any punctuation or a whole number, with an optional
/// leading country code `1`. Other lengths and all-zero numbers become `Null`.
pub fn normalize_phone(value: &Value) -> Value {
    let digits: String = match value {
        Value::Text(raw) => raw.chars().filter(char::is_ascii_digit).collect(),
        Value::Number(number)
            if (0.0..MAX_NUMERIC_PHONE).contains(number) && number.fract() == 0.0 =>
        {
            format!("{}", *number as u64)
        }
        _ => return Value::Null,
    };
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return Value::Null,
    };
    if local.chars().all(|c| c == '0') {
        return Value::Null;
    }
    Value::Text(format!("{}-{}-{}", &local[..3], &local[3..6], &local[6..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_collapse() {
        for raw in [
            "555-123-4567",
            "(555) 123-4567",
            "5551234567",
            "+1-555-123-4567",
            "555.123.4567",
        ] {
            assert_eq!(normalize_phone(&raw.into()), Value::from("555-123-4567"), "{raw}");
        }
    }

    #[test]
    fn test_numeric_input_is_formatted() {
        assert_eq!(normalize_phone(&Value::from(5_551_234_567.0)), Value::from("555-123-4567"));
        assert_eq!(normalize_phone(&Value::from(15_551_234_567.0)), Value::from("555-123-4567"));
        for number in [1_234_567.0, 5_551_234_567.5, -5_551_234_567.0, 1e12] {
            assert!(normalize_phone(&Value::from(number)).is_null(), "{number}");
        }
    }

    #[test]
    fn test_invalid_numbers_null() {
        for raw in ["000-000-0000", "INVALID", "", "N/A", "123-4567"] {
            assert!(normalize_phone(&raw.into()).is_null(), "{raw}");
        }
    }
}
