use std::fmt;

use scrub_model::{Severity, Value};
use scrub_rules::RuleTable;
use scrub_transform::normalization::{is_valid_email, normalize_ipv4, normalize_timestamp};
use scrub_transform::{IdentifierFormat, NumericRange};

/// Predicate over a single field value.
///
/// Every check except [`Check::NotMissing`] ignores null values, so that a
/// value nulled out by cleaning is not reported twice.
#[derive(Debug, Clone)]
pub enum Check {
    NotMissing,
    InRange(NumericRange),
    EmailFormat,
    IdentifierFormat(IdentifierFormat),
    /// Value is a timestamp or text that parses as one.
    Timestamp,
    CanonicalLabel(RuleTable),
    Ipv4,
}

impl Check {
    /// Short kind name, used as the issue `check` and rule id suffix.
    pub fn kind(&self) -> &'static str {
        match self {
            Check::NotMissing => "required",
            Check::InRange(_) => "range",
            Check::EmailFormat => "email",
            Check::IdentifierFormat(_) => "identifier",
            Check::Timestamp => "timestamp",
            Check::CanonicalLabel(_) => "label",
            Check::Ipv4 => "ipv4",
        }
    }

    pub fn is_violation(&self, value: &Value) -> bool {
        match self {
            Check::NotMissing => value.is_missing(),
            _ if value.is_null() => false,
            Check::InRange(range) => !value.to_number().is_some_and(|n| range.contains(n)),
            Check::EmailFormat => !value.as_text().is_some_and(is_valid_email),
            Check::IdentifierFormat(format) => {
                !value.as_text().is_some_and(|text| format.is_canonical(text))
            }
            Check::Timestamp => normalize_timestamp(value).is_null(),
            Check::CanonicalLabel(table) => !table.admits(value),
            Check::Ipv4 => normalize_ipv4(value) != *value,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::NotMissing => f.write_str("value is required"),
            Check::InRange(range) => write!(f, "value outside {range}"),
            Check::EmailFormat => f.write_str("malformed email address"),
            Check::IdentifierFormat(format) => {
                write!(f, "identifier not in {}-NNNN form", format.prefix())
            }
            Check::Timestamp => f.write_str("unparsable timestamp"),
            Check::CanonicalLabel(_) => f.write_str("value is not a canonical label"),
            Check::Ipv4 => f.write_str("invalid IPv4 address"),
        }
    }
}

/// What to do with a violating value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    /// Replace the value with null.
    NullOut,
    /// Move numbers onto the nearest closed bound; null when that bound is
    /// open. Non-numeric violations are nulled.
    Clamp,
    /// Leave the value; only count it.
    Flag,
}

impl fmt::Display for Remediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Remediation::NullOut => "set to null",
            Remediation::Clamp => "clamped",
            Remediation::Flag => "flagged",
        })
    }
}

/// A check on one field with its severity and remediation.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub id: String,
    pub field: String,
    pub check: Check,
    pub severity: Severity,
    pub remediation: Remediation,
}

impl ValidationRule {
    /// Rule with id `<field>.<check kind>`, error severity and `NullOut`.
    pub fn new(field: impl Into<String>, check: Check) -> Self {
        let field = field.into();
        Self {
            id: format!("{field}.{}", check.kind()),
            field,
            check,
            severity: Severity::Error,
            remediation: Remediation::NullOut,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_remediation(mut self, remediation: Remediation) -> Self {
        self.remediation = remediation;
        self
    }

    pub fn is_violation(&self, value: &Value) -> bool {
        self.check.is_violation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_only_violates_not_missing() {
        let checks = [
            Check::InRange(NumericRange::inclusive(0.0, 5.0)),
            Check::EmailFormat,
            Check::IdentifierFormat(IdentifierFormat::new("USR")),
            Check::Timestamp,
            Check::Ipv4,
        ];
        for check in checks {
            assert!(!check.is_violation(&Value::Null), "{}", check.kind());
        }
        assert!(Check::NotMissing.is_violation(&Value::Null));
        assert!(Check::NotMissing.is_violation(&"N/A".into()));
    }

    #[test]
    fn range_check_coerces_text() {
        let check = Check::InRange(NumericRange::inclusive(0.0, 5.0));
        assert!(!check.is_violation(&"3.5".into()));
        assert!(check.is_violation(&"10".into()));
        assert!(check.is_violation(&"lots".into()));
    }

    #[test]
    fn rule_id_defaults_to_field_and_kind() {
        let rule = ValidationRule::new("rating", Check::InRange(NumericRange::inclusive(0.0, 5.0)));
        assert_eq!(rule.id, "rating.range");
        assert_eq!(rule.severity, Severity::Error);
        assert_eq!(rule.remediation, Remediation::NullOut);
    }

    #[test]
    fn timestamp_check_accepts_parseable_text() {
        assert!(!Check::Timestamp.is_violation(&"2024-01-15 10:30:00".into()));
        assert!(Check::Timestamp.is_violation(&"INVALID_TIME".into()));
        assert!(Check::Timestamp.is_violation(&Value::from(1.0e30)));
    }
}
