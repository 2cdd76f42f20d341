//! Fields computed from other fields of the same record.
//!
//! A derived value is recomputed from scratch on every run and is `Null`
//! whenever any of its inputs is `Null`; a stale source value is never kept.

use std::fmt;

use chrono::NaiveDateTime;
use scrub_model::{Record, Value};

use crate::normalization::{parse_timestamp, round_to};

/// Keyword classes for bug titles, checked in order. The first class with a
/// matching keyword wins.
pub const BUG_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Crash/Fatal", &["crash", "exception", "null pointer"]),
    (
        "UI/Visual",
        &["ui", "css", "button", "overlapping", "alignment", "looks weird"],
    ),
    ("Performance", &["slow", "timeout", "performance", "memory leak"]),
    ("Security", &["security", "xss", "vulnerability", "permission"]),
    ("API/Integration", &["api", "500", "404", "gateway"]),
    (
        "Data Integrity",
        &["data", "wrong", "calculation", "search results"],
    ),
];

/// Class for titles that match no keyword.
pub const DEFAULT_BUG_TYPE: &str = "Functional";

#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// `target = round(product of inputs, decimals)`.
    Product {
        target: String,
        inputs: Vec<String>,
        decimals: u32,
    },
    /// Whole days from `start` to `end`; negative spans are `Null`.
    DayDifference {
        target: String,
        start: String,
        end: String,
    },
    /// Keyword classification of a title.
    BugType { target: String, source: String },
}

impl Derivation {
    pub fn target(&self) -> &str {
        match self {
            Derivation::Product { target, .. }
            | Derivation::DayDifference { target, .. }
            | Derivation::BugType { target, .. } => target,
        }
    }

    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Derivation::Product { inputs, .. } => inputs.iter().map(String::as_str).collect(),
            Derivation::DayDifference { start, end, .. } => vec![start.as_str(), end.as_str()],
            Derivation::BugType { source, .. } => vec![source.as_str()],
        }
    }

    pub fn compute(&self, record: &Record) -> Value {
        match self {
            Derivation::Product {
                inputs, decimals, ..
            } => {
                let mut product = 1.0;
                for input in inputs {
                    match record.get(input).to_number() {
                        Some(number) => product *= number,
                        None => return Value::Null,
                    }
                }
                Value::Number(round_to(product, *decimals))
            }
            Derivation::DayDifference { start, end, .. } => {
                match (as_timestamp(record.get(start)), as_timestamp(record.get(end))) {
                    (Some(start), Some(end)) => {
                        let days = (end - start).num_days();
                        if days < 0 {
                            Value::Null
                        } else {
                            Value::from(days)
                        }
                    }
                    _ => Value::Null,
                }
            }
            Derivation::BugType { source, .. } => match record.get(source) {
                Value::Text(title) => Value::from(classify_bug_type(title)),
                _ => Value::Null,
            },
        }
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derivation::Product { target, inputs, .. } => {
                write!(f, "{target} = {}", inputs.join(" x "))
            }
            Derivation::DayDifference { target, start, end } => {
                write!(f, "{target} = days from {start} to {end}")
            }
            Derivation::BugType { target, source } => {
                write!(f, "{target} = keyword class of {source}")
            }
        }
    }
}

fn as_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Text(text) => parse_timestamp(text),
        _ => None,
    }
}

/// Classify a bug title by keyword.
pub fn classify_bug_type(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    BUG_TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map_or(DEFAULT_BUG_TYPE, |(label, _)| *label)
}
