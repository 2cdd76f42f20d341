//! Read-only data-quality validation.
//!
//! A [`Validator`] holds the declared rules for one table and the identity
//! key used for duplicate detection. Validation never mutates the table, so
//! the same validator serves as a diagnostic before cleaning and as a
//! verification step after it.
//!
//! Per rule the report carries the violating record count and up to
//! [`MAX_SAMPLES`] distinct offending values. A rule whose field is absent
//! from the table is reported as a presence issue instead.

use std::collections::BTreeSet;

use scrub_model::{QualityIssue, QualityReport, Table};
use tracing::debug;

use crate::rule::ValidationRule;

/// Distinct sample values kept per issue.
pub const MAX_SAMPLES: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<ValidationRule>,
    identity: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Identity fields for duplicate counting; empty means whole-record.
    #[must_use]
    pub fn with_identity<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.identity = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn identity(&self) -> &[String] {
        &self.identity
    }

    pub fn validate(&self, table: &Table) -> QualityReport {
        let mut report = QualityReport::new(&table.name, table.len());
        report.duplicate_records = table.duplicate_count(self.identity.as_slice());
        for column in &table.columns {
            report
                .missing_values
                .insert(column.clone(), table.missing_count(column));
        }

        for rule in &self.rules {
            let issue = if table.has_column(&rule.field) {
                rule_issue(rule, table)
            } else {
                Some(missing_field_issue(rule, table))
            };
            if let Some(issue) = issue {
                report.issues.push(issue);
            }
        }

        debug!(
            table = %table.name,
            records = report.total_records,
            duplicates = report.duplicate_records,
            issues = report.issues.len(),
            "validated table"
        );
        report
    }
}

fn rule_issue(rule: &ValidationRule, table: &Table) -> Option<QualityIssue> {
    let mut count = 0u64;
    let mut samples = BTreeSet::new();
    for value in table.column_values(&rule.field) {
        if !rule.is_violation(value) {
            continue;
        }
        count += 1;
        if samples.len() < MAX_SAMPLES {
            samples.insert(value.to_string());
        }
    }
    if count == 0 {
        return None;
    }
    Some(QualityIssue {
        rule_id: rule.id.clone(),
        field: Some(rule.field.clone()),
        check: rule.check.kind().to_string(),
        message: format!("{}: {} in {count} record(s)", rule.field, rule.check),
        severity: rule.severity,
        count,
        samples: samples.into_iter().collect(),
    })
}

fn missing_field_issue(rule: &ValidationRule, table: &Table) -> QualityIssue {
    QualityIssue {
        rule_id: rule.id.clone(),
        field: Some(rule.field.clone()),
        check: "presence".to_string(),
        message: format!("field '{}' not found in table '{}'", rule.field, table.name),
        severity: rule.severity,
        count: table.len() as u64,
        samples: Vec::new(),
    }
}
