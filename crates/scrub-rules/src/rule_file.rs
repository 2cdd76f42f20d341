#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// On-disk shape of a rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rule_set: Option<RuleSetHeader>,
    #[serde(default, rename = "rule_table")]
    pub tables: Vec<RuleTableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetHeader {
    pub name: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_schema_version() -> u32 {
    1
}

/// One `[[rule_table]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTableDef {
    pub table: String,
    pub field: String,
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    /// Canonical label to the raw variants that collapse onto it.
    #[serde(default)]
    pub map: BTreeMap<String, Vec<String>>,
}
