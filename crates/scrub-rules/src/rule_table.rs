//! Categorical remapping tables.
//!
//! A [`RuleTable`] is scoped to one `(table, field)` pair and maps every
//! known raw token onto a canonical label. Lookups never fail: anything the
//! table does not know resolves to its [`Fallback`].

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use scrub_model::Value;

use crate::error::{Result, RulesError};

/// What an unmapped token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A fixed label such as `"Unknown"`.
    Label(String),
    /// The field is nullable; unmapped tokens become null.
    Null,
}

impl Fallback {
    pub fn label(&self) -> Option<&str> {
        match self {
            Fallback::Label(label) => Some(label.as_str()),
            Fallback::Null => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Fallback::Label(label) => Value::Text(label.clone()),
            Fallback::Null => Value::Null,
        }
    }
}

/// Lookup key for a raw token: trimmed, internal whitespace collapsed,
/// lower-cased.
pub fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    table: String,
    field: String,
    labels: Vec<String>,
    lookup: BTreeMap<String, String>,
    fallback: Fallback,
}

impl RuleTable {
    pub fn builder(
        table: impl Into<String>,
        field: impl Into<String>,
        fallback: Fallback,
    ) -> RuleTableBuilder {
        RuleTableBuilder {
            table: table.into(),
            field: field.into(),
            fallback,
            labels: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub fn is_nullable(&self) -> bool {
        self.fallback == Fallback::Null
    }

    pub fn canonical_labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of raw keys (labels included) the table recognises.
    pub fn variant_count(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_canonical(&self, label: &str) -> bool {
        self.labels.iter().any(|known| known == label)
    }

    /// Canonical label for a raw token, if the table maps it.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.lookup.get(&normalize_token(raw)).map(String::as_str)
    }

    /// Map a value onto a canonical label or the fallback.
    ///
    /// Explicit entries win, so a table may map a placeholder such as
    /// `"N/A"` onto a real label. Everything else that is unmapped (null,
    /// numbers, timestamps, placeholders, unknown text) takes the fallback.
    pub fn canonicalize(&self, value: &Value) -> Value {
        match value {
            Value::Text(text) => match self.lookup(text) {
                Some(label) => Value::Text(label.to_string()),
                None => self.fallback.to_value(),
            },
            _ => self.fallback.to_value(),
        }
    }

    /// True when `value` is a legal post-normalization value: a canonical
    /// label, the fallback label, or null on a nullable field.
    pub fn admits(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.is_nullable(),
            Value::Text(text) => {
                self.is_canonical(text) || self.fallback.label() == Some(text.as_str())
            }
            _ => false,
        }
    }
}

pub struct RuleTableBuilder {
    table: String,
    field: String,
    fallback: Fallback,
    labels: Vec<(String, Vec<String>)>,
}

impl RuleTableBuilder {
    /// Declare a canonical label and the raw variants that collapse onto it.
    #[must_use]
    pub fn label<I, S>(mut self, label: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.push((
            label.into(),
            variants.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<RuleTable> {
        let mut lookup: BTreeMap<String, String> = BTreeMap::new();
        let mut labels = Vec::with_capacity(self.labels.len());

        for (label, variants) in &self.labels {
            if label.trim().is_empty() {
                return Err(RulesError::EmptyLabel {
                    table: self.table.clone(),
                    field: self.field.clone(),
                });
            }
            // Labels map to themselves so canonicalize is idempotent.
            for raw in std::iter::once(label).chain(variants.iter()) {
                let key = normalize_token(raw);
                match lookup.get(&key) {
                    Some(existing) if existing != label => {
                        return Err(RulesError::ConflictingVariant {
                            table: self.table.clone(),
                            field: self.field.clone(),
                            variant: raw.clone(),
                            first: existing.clone(),
                            second: label.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(key, label.clone());
                    }
                }
            }
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }

        Ok(RuleTable {
            table: self.table,
            field: self.field,
            labels,
            lookup,
            fallback: self.fallback,
        })
    }
}
