//! Mapping several source tables onto one unified schema.
//!
//! Each [`SourceMapping`] names the source table to read and, for every
//! unified column it fills, where the value comes from. Unified columns a
//! source does not fill are `Null`. Records are concatenated in mapping
//! order and per-source counts are kept for lineage.

use std::collections::BTreeMap;

use scrub_model::{Record, Result, ScrubError, Table, TableSource, Value};
use tracing::{debug, info};

/// Where a unified column gets its value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// Copy a source column.
    Column(String),
    /// Same value for every record of the source.
    Constant(Value),
    /// Source column with a prefix (`42` -> `GH-42`); nulls stay null.
    Prefixed { prefix: String, column: String },
    /// First class whose keyword occurs in the lower-cased source text;
    /// `Null` when none matches.
    Keywords {
        column: String,
        classes: Vec<(String, Vec<String>)>,
    },
}

impl FieldSource {
    fn column(&self) -> Option<&str> {
        match self {
            FieldSource::Column(column)
            | FieldSource::Prefixed { column, .. }
            | FieldSource::Keywords { column, .. } => Some(column.as_str()),
            FieldSource::Constant(_) => None,
        }
    }

    fn resolve(&self, record: &Record) -> Value {
        match self {
            FieldSource::Column(column) => record.get(column).clone(),
            FieldSource::Constant(value) => value.clone(),
            FieldSource::Prefixed { prefix, column } => match record.get(column) {
                Value::Null => Value::Null,
                value => Value::Text(format!("{prefix}{}", value.to_string().trim())),
            },
            FieldSource::Keywords { column, classes } => {
                let Some(text) = record.get(column).as_text() else {
                    return Value::Null;
                };
                let lower = text.to_lowercase();
                classes
                    .iter()
                    .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword.as_str())))
                    .map_or(Value::Null, |(label, _)| Value::from(label.as_str()))
            }
        }
    }
}

/// How one source table maps onto the unified schema.
#[derive(Debug, Clone)]
pub struct SourceMapping {
    /// Short label used in per-source counts.
    pub label: String,
    /// Table to read from the source.
    pub table: String,
    pub fields: Vec<(String, FieldSource)>,
}

impl SourceMapping {
    pub fn new(label: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            table: table.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, target: impl Into<String>, source: FieldSource) -> Self {
        self.fields.push((target.into(), source));
        self
    }

    /// Copy a column under the same name.
    #[must_use]
    pub fn same(self, column: &str) -> Self {
        self.field(column, FieldSource::Column(column.to_string()))
    }

    #[must_use]
    pub fn rename(self, target: &str, column: &str) -> Self {
        self.field(target, FieldSource::Column(column.to_string()))
    }

    #[must_use]
    pub fn constant(self, target: &str, value: impl Into<Value>) -> Self {
        self.field(target, FieldSource::Constant(value.into()))
    }

    #[must_use]
    pub fn prefixed(self, target: &str, prefix: &str, column: &str) -> Self {
        self.field(
            target,
            FieldSource::Prefixed {
                prefix: prefix.to_string(),
                column: column.to_string(),
            },
        )
    }

    #[must_use]
    pub fn keywords(self, target: &str, column: &str, classes: &[(&str, &[&str])]) -> Self {
        let classes = classes
            .iter()
            .map(|(label, words)| {
                (
                    (*label).to_string(),
                    words.iter().map(|word| word.to_lowercase()).collect(),
                )
            })
            .collect();
        self.field(
            target,
            FieldSource::Keywords {
                column: column.to_string(),
                classes,
            },
        )
    }

    /// Source columns this mapping reads.
    pub fn required_columns(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|(_, source)| source.column())
            .collect()
    }
}

/// A unified table with the number of records each source contributed.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pub table: Table,
    pub counts: BTreeMap<String, usize>,
}

/// Concatenate already-read source tables under `columns`.
///
/// Fails with `SchemaMismatch` when a non-empty source table lacks a column
/// its mapping reads.
pub fn unify_sources(
    name: &str,
    columns: &[&str],
    parts: Vec<(&SourceMapping, Table)>,
) -> Result<UnifiedTable> {
    let mut unified = Table::new(name, columns.iter().map(ToString::to_string).collect());
    let mut counts = BTreeMap::new();
    for (mapping, source) in parts {
        // An empty JSON export carries no columns at all.
        let missing = source.missing_columns(mapping.required_columns().as_slice());
        if !source.is_empty() && !missing.is_empty() {
            return Err(ScrubError::SchemaMismatch {
                table: source.name,
                missing,
            });
        }
        for record in &source.records {
            let mut row = Record::new();
            for column in columns {
                row.set(*column, Value::Null);
            }
            for (target, field) in &mapping.fields {
                row.set(target.clone(), field.resolve(record));
            }
            unified.push(row);
        }
        debug!(source = %mapping.label, records = source.len(), "mapped source");
        *counts.entry(mapping.label.clone()).or_insert(0) += source.len();
    }
    info!(table = name, records = unified.len(), sources = counts.len(), "unified sources");
    Ok(UnifiedTable {
        table: unified,
        counts,
    })
}

/// Read every mapped table from `source`, then unify them.
pub fn read_unified(
    source: &mut dyn TableSource,
    name: &str,
    columns: &[&str],
    mappings: &[SourceMapping],
) -> Result<UnifiedTable> {
    let mut parts = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        parts.push((mapping, source.read_table(&mapping.table)?));
    }
    unify_sources(name, columns, parts)
}
