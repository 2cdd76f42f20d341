#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod paths;
pub mod registry;
pub mod rule_file;
pub mod rule_table;

pub use crate::error::RulesError;
pub use crate::paths::{RULES_ENV_VAR, resolve_rules_path};
pub use crate::registry::{DEFAULT_RULES, RuleRegistry};
pub use crate::rule_table::{Fallback, RuleTable, RuleTableBuilder, normalize_token};
