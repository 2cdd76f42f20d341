use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A data-quality finding for one declared rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Rule identifier (e.g., "products.rating.range").
    pub rule_id: String,
    /// Field the rule inspects, if any.
    pub field: Option<String>,
    /// Check kind (e.g., "range", "email", "duplicate").
    pub check: String,
    /// Human-readable message.
    pub message: String,
    pub severity: Severity,
    /// Number of violating records.
    pub count: u64,
    /// A few offending raw values.
    pub samples: Vec<String>,
}

/// Read-only quality summary of one table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(rename = "table")]
    pub table_name: String,
    pub total_records: usize,
    /// Records beyond the first in each identity-key group.
    pub duplicate_records: usize,
    /// Null or placeholder count per column.
    pub missing_values: BTreeMap<String, usize>,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn new(table_name: impl Into<String>, total_records: usize) -> Self {
        Self {
            table_name: table_name.into(),
            total_records,
            ..Self::default()
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Violation count for a rule; zero when the rule raised no issue.
    pub fn violations(&self, rule_id: &str) -> u64 {
        self.issues
            .iter()
            .filter(|issue| issue.rule_id == rule_id)
            .map(|issue| issue.count)
            .sum()
    }

    pub fn total_missing(&self) -> usize {
        self.missing_values.values().sum()
    }
}
