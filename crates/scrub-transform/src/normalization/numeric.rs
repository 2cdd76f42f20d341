//! Numeric normalization utilities.

use std::fmt;
use std::ops::Bound;

use scrub_model::Value;

/// Parses a string as f64, returning None for invalid, empty or NaN input.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// An interval of valid numbers. Each end is independently inclusive,
/// exclusive or unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
}

impl NumericRange {
    /// `[min, max)`.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            lower: Bound::Included(min),
            upper: Bound::Excluded(max),
        }
    }

    /// `[min, max]`.
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            lower: Bound::Included(min),
            upper: Bound::Included(max),
        }
    }

    /// `(0, ∞)`.
    pub fn positive() -> Self {
        Self {
            lower: Bound::Excluded(0.0),
            upper: Bound::Unbounded,
        }
    }

    /// `[0, ∞)`.
    pub fn non_negative() -> Self {
        Self {
            lower: Bound::Included(0.0),
            upper: Bound::Unbounded,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = match self.lower {
            Bound::Included(min) => value >= min,
            Bound::Excluded(min) => value > min,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Included(max) => value <= max,
            Bound::Excluded(max) => value < max,
            Bound::Unbounded => true,
        };
        !value.is_nan() && above && below
    }

    /// Keep in-range numbers (coercing numeric text); everything else is
    /// `Null`.
    pub fn normalize(&self, value: &Value) -> Value {
        match value.to_number() {
            Some(number) if self.contains(number) => Value::Number(number),
            _ => Value::Null,
        }
    }

    /// Nearest in-range value, or `None` when the violated end is open.
    pub fn clamp(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        if self.contains(value) {
            return Some(value);
        }
        let below_lower = match self.lower {
            Bound::Included(min) | Bound::Excluded(min) => value <= min,
            Bound::Unbounded => false,
        };
        if below_lower {
            return match self.lower {
                Bound::Included(min) => Some(min),
                _ => None,
            };
        }
        match self.upper {
            Bound::Included(max) => Some(max),
            _ => None,
        }
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Included(min) => write!(f, "[{min}, ")?,
            Bound::Excluded(min) => write!(f, "({min}, ")?,
            Bound::Unbounded => f.write_str("(-inf, ")?,
        }
        match self.upper {
            Bound::Included(max) => write!(f, "{max}]"),
            Bound::Excluded(max) => write!(f, "{max})"),
            Bound::Unbounded => f.write_str("inf)"),
        }
    }
}
