//! Email canonicalization.

use std::sync::LazyLock;

use regex::Regex;
use scrub_model::{Value, is_placeholder};

/// One `@`, a non-empty local part and a dotted domain whose labels are
/// all non-empty.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("Invalid email regex")
});

/// Lower-case and trim; malformed or placeholder addresses become `Null`.
pub fn normalize_email(value: &Value) -> Value {
    let Some(raw) = value.as_text() else {
        return Value::Null;
    };
    let candidate = raw.trim().to_lowercase();
    if is_placeholder(&candidate) || !EMAIL_REGEX.is_match(&candidate) {
        return Value::Null;
    }
    Value::Text(candidate)
}

/// True when `raw` is already a canonical email address.
pub fn is_valid_email(raw: &str) -> bool {
    raw == raw.trim().to_lowercase() && EMAIL_REGEX.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(
            normalize_email(&" JOHN@Email.COM ".into()),
            Value::from("john@email.com")
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in [
            "jane@@test.com",
            "john@email",
            "invalid-email",
            "@test.com",
            "a@.com",
            "a@test.",
            "a b@test.com",
            "N/A",
            "",
        ] {
            assert!(normalize_email(&raw.into()).is_null(), "{raw}");
        }
        assert!(normalize_email(&Value::from(42.0)).is_null());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("bob@company.com"));
        assert!(!is_valid_email("Bob@company.com"));
        assert!(!is_valid_email("bob@company"));
    }
}
