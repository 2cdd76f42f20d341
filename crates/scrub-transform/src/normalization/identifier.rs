//! `PREFIX-NNNN` identifiers.

use scrub_model::{Value, is_placeholder};

/// Canonical identifier shape: an upper-case prefix, a dash and a run of
/// digits, optionally zero-padded to a fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierFormat {
    prefix: String,
    width: Option<usize>,
}

impl IdentifierFormat {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
            width: None,
        }
    }

    /// Zero-pad the numeric part to `width` digits.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Identifier used for placeholders and unparsable input.
    pub fn sentinel(&self) -> String {
        format!("{}-UNKNOWN", self.prefix)
    }

    /// Canonicalize bare numbers (text or numeric) and already-prefixed ids
    /// in any case with `-`, `_` or no separator. Everything else maps to
    /// the sentinel; the record is never dropped.
    pub fn normalize(&self, value: &Value) -> Value {
        let digits = match value {
            Value::Number(number)
                if (0.0..u64::MAX as f64).contains(number) && number.fract() == 0.0 =>
            {
                Some(format!("{}", *number as u64))
            }
            Value::Text(text) => self.digits_of(text),
            _ => None,
        };
        match digits {
            Some(digits) => Value::Text(self.format(&digits)),
            None => Value::Text(self.sentinel()),
        }
    }

    /// True when `raw` is exactly in canonical form (the sentinel included).
    pub fn is_canonical(&self, raw: &str) -> bool {
        raw == self.sentinel()
            || (raw.starts_with(&self.prefix)
                && self.digits_of(raw).is_some_and(|digits| self.format(&digits) == raw))
    }

    fn digits_of(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if is_placeholder(trimmed) {
            return None;
        }
        let upper = trimmed.to_uppercase();
        let rest = match upper.strip_prefix(&self.prefix) {
            Some(rest) => rest
                .strip_prefix('-')
                .or_else(|| rest.strip_prefix('_'))
                .unwrap_or(rest),
            None => upper.as_str(),
        };
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            Some(rest.to_string())
        } else {
            None
        }
    }

    fn format(&self, digits: &str) -> String {
        match self.width {
            Some(width) => format!("{}-{digits:0>width$}", self.prefix),
            None => format!("{}-{digits}", self.prefix),
        }
    }
}
