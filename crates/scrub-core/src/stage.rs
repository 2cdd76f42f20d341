//! Cleaning stages.
//!
//! A stage is one named, deterministic transformation over a table. Each
//! execution produces a [`StageOutcome`] that the pipeline turns into exactly
//! one lineage record. Every provided stage is idempotent: applying it to its
//! own output changes nothing.
//!
//! | Stage | Effect | May remove rows |
//! |-------|--------|-----------------|
//! | [`DedupeStage`] | keep the first record per identity key | yes |
//! | [`NormalizeStage`] | apply one [`FieldRule`] to one or more fields | no |
//! | [`RemediateStage`] | apply a validation rule's remediation | no |
//! | [`DeriveStage`] | recompute a derived field | no |

use scrub_model::{Table, Value};
use scrub_rules::Fallback;
use scrub_transform::{Derivation, FieldRule};
use scrub_validate::{ValidationRule, remediate};
use tracing::warn;

use crate::dedupe::dedupe;

/// What a stage did, as reported to the lineage log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub description: String,
    pub details: String,
    pub reason: String,
    /// Values changed or rows removed.
    pub affected: usize,
}

/// A single named transformation in a cleaning pipeline.
pub trait CleaningStage: Send + Sync {
    /// Unique name within a pipeline.
    fn name(&self) -> &str;

    /// Names of stages that must run before this one.
    fn depends_on(&self) -> &[String] {
        &[]
    }

    /// Fields that must be present in the input table.
    fn required_fields(&self) -> Vec<&str>;

    /// Whether this stage is allowed to shrink the table.
    fn removes_rows(&self) -> bool {
        false
    }

    /// Transform the table in place.
    fn apply(&self, table: &mut Table) -> StageOutcome;
}

/// Removes records with a repeated identity key.
#[derive(Debug, Clone)]
pub struct DedupeStage {
    name: String,
    identity: Vec<String>,
    depends_on: Vec<String>,
    reason: String,
}

impl DedupeStage {
    /// Dedupe on `identity`; an empty list removes exact duplicates.
    pub fn new<S: Into<String>>(identity: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: "dedupe".to_string(),
            identity: identity.into_iter().map(Into::into).collect(),
            depends_on: Vec::new(),
            reason: "Duplicate records inflate counts and skew analysis; the first \
                     occurrence is kept."
                .to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn after(mut self, stage: impl Into<String>) -> Self {
        self.depends_on.push(stage.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn identity(&self) -> &[String] {
        &self.identity
    }
}

impl CleaningStage for DedupeStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn required_fields(&self) -> Vec<&str> {
        self.identity.iter().map(String::as_str).collect()
    }

    fn removes_rows(&self) -> bool {
        true
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        let before = table.len();
        let removed = dedupe(table, self.identity.as_slice());
        let key = if self.identity.is_empty() {
            "all columns".to_string()
        } else {
            self.identity.join(", ")
        };
        StageOutcome {
            description: "Removed duplicate rows".to_string(),
            details: format!(
                "{removed} duplicate(s) removed by [{key}]; {before} -> {} rows",
                table.len()
            ),
            reason: self.reason.clone(),
            affected: removed,
        }
    }
}

/// Applies one field rule to each of its fields.
#[derive(Debug, Clone)]
pub struct NormalizeStage {
    name: String,
    rule: FieldRule,
    fields: Vec<String>,
    depends_on: Vec<String>,
    reason: String,
}

impl NormalizeStage {
    /// Stage named after its fields.
    pub fn new<S: Into<String>>(rule: FieldRule, fields: impl IntoIterator<Item = S>) -> Self {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        Self {
            name: fields.join("+"),
            reason: format!("Inconsistent {} values prevent reliable grouping.", fields.join(", ")),
            rule,
            fields,
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn after(mut self, stage: impl Into<String>) -> Self {
        self.depends_on.push(stage.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether a non-missing input ended on the rule's fallback.
    fn fell_back(&self, before: &Value, after: &Value) -> bool {
        match &self.rule {
            FieldRule::Categorical(table) => match before {
                Value::Text(text) => table.lookup(text).is_none(),
                _ => match table.fallback() {
                    Fallback::Label(label) => after.as_text() == Some(label.as_str()),
                    Fallback::Null => after.is_null(),
                },
            },
            FieldRule::Identifier(format) => after.as_text() == Some(format.sentinel().as_str()),
            _ => after.is_null(),
        }
    }
}

impl CleaningStage for NormalizeStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn required_fields(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        let mut changed = 0usize;
        let mut fell_back_total = 0usize;
        for field in &self.fields {
            let mut present = 0usize;
            let mut fell_back = 0usize;
            for record in &mut table.records {
                let current = record.get(field);
                let next = self.rule.apply(current);
                if !current.is_missing() {
                    present += 1;
                    if self.fell_back(current, &next) {
                        fell_back += 1;
                    }
                }
                if next != *current {
                    record.set(field.clone(), next);
                    changed += 1;
                }
            }
            if present > 0 && fell_back == present {
                warn!(
                    stage = %self.name,
                    field = %field,
                    values = present,
                    "every value in column fell back"
                );
            }
            fell_back_total += fell_back;
        }
        StageOutcome {
            description: format!("Standardized {}", self.fields.join(", ")),
            details: format!(
                "{}; {changed} value(s) changed, {fell_back_total} unmapped",
                self.rule
            ),
            reason: self.reason.clone(),
            affected: changed,
        }
    }
}

/// Applies a validation rule's remediation.
#[derive(Debug, Clone)]
pub struct RemediateStage {
    name: String,
    rule: ValidationRule,
    depends_on: Vec<String>,
    reason: String,
}

impl RemediateStage {
    /// Stage named after the rule id.
    pub fn new(rule: ValidationRule) -> Self {
        Self {
            name: rule.id.clone(),
            reason: format!("{} values that violate '{}' cannot be trusted.", rule.field, rule.check),
            rule,
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn after(mut self, stage: impl Into<String>) -> Self {
        self.depends_on.push(stage.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }
}

impl CleaningStage for RemediateStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn required_fields(&self) -> Vec<&str> {
        vec![self.rule.field.as_str()]
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        let affected = remediate(&self.rule, table);
        StageOutcome {
            description: format!("Cleaned {}", self.rule.field),
            details: format!(
                "{affected} value(s) {}: {}",
                self.rule.remediation, self.rule.check
            ),
            reason: self.reason.clone(),
            affected,
        }
    }
}

/// Recomputes a derived field from its inputs, adding the column if needed.
#[derive(Debug, Clone)]
pub struct DeriveStage {
    name: String,
    derivation: Derivation,
    depends_on: Vec<String>,
    reason: String,
}

impl DeriveStage {
    /// Stage named after the derived field.
    pub fn new(derivation: Derivation) -> Self {
        Self {
            name: derivation.target().to_string(),
            reason: format!(
                "{} is recomputed from its inputs so it can never disagree with them.",
                derivation.target()
            ),
            derivation,
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn after(mut self, stage: impl Into<String>) -> Self {
        self.depends_on.push(stage.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn derivation(&self) -> &Derivation {
        &self.derivation
    }
}

impl CleaningStage for DeriveStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn required_fields(&self) -> Vec<&str> {
        self.derivation.inputs()
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        let target = self.derivation.target().to_string();
        table.add_column(&target);
        let mut changed = 0usize;
        let mut nulls = 0usize;
        for record in &mut table.records {
            let next = self.derivation.compute(record);
            if next.is_null() {
                nulls += 1;
            }
            if next != *record.get(&target) {
                record.set(target.clone(), next);
                changed += 1;
            }
        }
        StageOutcome {
            description: format!("Derived {target}"),
            details: format!(
                "{}; {changed} value(s) updated, {nulls} null",
                self.derivation
            ),
            reason: self.reason.clone(),
            affected: changed,
        }
    }
}
