//! One normalizer configured for a field.

use std::fmt;

use scrub_model::Value;
use scrub_rules::RuleTable;

use crate::normalization::{
    IdentifierFormat, NumericRange, normalize_duration_minutes, normalize_email, normalize_ipv4,
    normalize_person, normalize_person_name, normalize_phone, normalize_timestamp,
};

/// A pure, idempotent value normalizer.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Remap onto the canonical labels of a rule table.
    Categorical(RuleTable),
    Email,
    Identifier(IdentifierFormat),
    Timestamp,
    Numeric(NumericRange),
    DurationMinutes,
    /// Free text naming a person or module; placeholders become the label.
    Placeholder { fallback: String },
    PersonName { fallback: String },
    Phone,
    Ipv4,
}

impl FieldRule {
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            FieldRule::Categorical(table) => table.canonicalize(value),
            FieldRule::Email => normalize_email(value),
            FieldRule::Identifier(format) => format.normalize(value),
            FieldRule::Timestamp => normalize_timestamp(value),
            FieldRule::Numeric(range) => range.normalize(value),
            FieldRule::DurationMinutes => normalize_duration_minutes(value),
            FieldRule::Placeholder { fallback } => normalize_person(value, fallback),
            FieldRule::PersonName { fallback } => normalize_person_name(value, fallback),
            FieldRule::Phone => normalize_phone(value),
            FieldRule::Ipv4 => normalize_ipv4(value),
        }
    }

    /// Short kind name used in lineage and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldRule::Categorical(_) => "categorical",
            FieldRule::Email => "email",
            FieldRule::Identifier(_) => "identifier",
            FieldRule::Timestamp => "timestamp",
            FieldRule::Numeric(_) => "numeric",
            FieldRule::DurationMinutes => "duration",
            FieldRule::Placeholder { .. } => "placeholder",
            FieldRule::PersonName { .. } => "name",
            FieldRule::Phone => "phone",
            FieldRule::Ipv4 => "ipv4",
        }
    }

    /// Whether `value` can appear in a field after this rule ran.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            FieldRule::Categorical(table) => table.admits(value),
            FieldRule::Identifier(format) => value.as_text().is_some_and(|t| format.is_canonical(t)),
            FieldRule::Placeholder { .. } | FieldRule::PersonName { .. } => value.as_text().is_some(),
            _ => self.apply(value) == *value,
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Categorical(table) => write!(
                f,
                "mapped to {} canonical labels",
                table.canonical_labels().len()
            ),
            FieldRule::Email => f.write_str("lower-cased emails, malformed set to null"),
            FieldRule::Identifier(format) => write!(
                f,
                "canonicalized to {}-NNNN, unparsable set to {}",
                format.prefix(),
                format.sentinel()
            ),
            FieldRule::Timestamp => f.write_str("parsed to ISO timestamps, unparsable set to null"),
            FieldRule::Numeric(range) => write!(f, "values outside {range} set to null"),
            FieldRule::DurationMinutes => {
                f.write_str("converted to minutes, non-positive set to null")
            }
            FieldRule::Placeholder { fallback } => {
                write!(f, "placeholders replaced with '{fallback}'")
            }
            FieldRule::PersonName { fallback } => {
                write!(f, "title-cased, placeholders replaced with '{fallback}'")
            }
            FieldRule::Phone => f.write_str("formatted as NNN-NNN-NNNN, invalid set to null"),
            FieldRule::Ipv4 => f.write_str("validated IPv4, placeholders set to null"),
        }
    }
}
