#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, RulesError};
use crate::hash::sha256_hex;
use crate::rule_file::{RuleFile, RuleTableDef};
use crate::rule_table::{Fallback, RuleTable};

/// Rule set compiled into the binary.
pub const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// All rule tables of one rule set, indexed by `(table, field)`.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    name: String,
    origin: String,
    fingerprint: String,
    tables: BTreeMap<(String, String), RuleTable>,
}

impl RuleRegistry {
    /// The embedded default rule set.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES, "<builtin>")
    }

    /// Load a rule file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RulesError::io(path, e))?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Load `path` when given, otherwise the embedded default.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(text).map_err(|source| RulesError::Toml {
            origin: origin.to_string(),
            source,
        })?;

        let name = match &file.rule_set {
            Some(header) if header.schema_version != SUPPORTED_SCHEMA_VERSION => {
                return Err(RulesError::UnsupportedSchema {
                    version: header.schema_version,
                });
            }
            Some(header) => header.name.clone(),
            None => "unnamed".to_string(),
        };

        let mut tables = BTreeMap::new();
        for def in &file.tables {
            let table = build_table(def)?;
            let key = (def.table.clone(), def.field.clone());
            if tables.contains_key(&key) {
                return Err(RulesError::DuplicateTable {
                    table: def.table.clone(),
                    field: def.field.clone(),
                });
            }
            tables.insert(key, table);
        }

        let fingerprint = sha256_hex(text.as_bytes());
        debug!(
            origin,
            rule_set = %name,
            tables = tables.len(),
            fingerprint = %fingerprint,
            "loaded rule set"
        );

        Ok(Self {
            name,
            origin: origin.to_string(),
            fingerprint,
            tables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the rule set came from (a path or `<builtin>`).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// SHA-256 of the rule source text.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn get(&self, table: &str, field: &str) -> Option<&RuleTable> {
        self.tables.get(&(table.to_string(), field.to_string()))
    }

    pub fn require(&self, table: &str, field: &str) -> Result<&RuleTable> {
        self.get(table, field).ok_or_else(|| RulesError::UnknownTable {
            table: table.to_string(),
            field: field.to_string(),
        })
    }

    /// Rule tables ordered by `(table, field)`.
    pub fn tables(&self) -> impl Iterator<Item = &RuleTable> {
        self.tables.values()
    }

    /// Rule tables scoped to one data table.
    pub fn tables_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RuleTable> + 'a {
        self.tables.values().filter(move |rule| rule.table() == table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn build_table(def: &RuleTableDef) -> Result<RuleTable> {
    let fallback = match (&def.fallback, def.nullable) {
        (Some(_), true) => {
            return Err(RulesError::AmbiguousFallback {
                table: def.table.clone(),
                field: def.field.clone(),
            });
        }
        (Some(label), false) => Fallback::Label(label.clone()),
        (None, true) => Fallback::Null,
        (None, false) => {
            return Err(RulesError::MissingFallback {
                table: def.table.clone(),
                field: def.field.clone(),
            });
        }
    };

    def.map
        .iter()
        .fold(
            RuleTable::builder(&def.table, &def.field, fallback),
            |builder, (label, variants)| builder.label(label, variants.iter().cloned()),
        )
        .build()
}
