#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule set {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported rule set schema_version: {version}")]
    UnsupportedSchema { version: u32 },

    #[error("rule table {table}.{field} declares neither a fallback nor nullable = true")]
    MissingFallback { table: String, field: String },

    #[error("rule table {table}.{field} declares both a fallback and nullable = true")]
    AmbiguousFallback { table: String, field: String },

    #[error("duplicate rule table for {table}.{field}")]
    DuplicateTable { table: String, field: String },

    #[error("rule table {table}.{field} has an empty canonical label")]
    EmptyLabel { table: String, field: String },

    #[error(
        "rule table {table}.{field}: variant '{variant}' maps to both '{first}' and '{second}'"
    )]
    ConflictingVariant {
        table: String,
        field: String,
        variant: String,
        first: String,
        second: String,
    },

    #[error("no rule table for {table}.{field}")]
    UnknownTable { table: String, field: String },
}

impl RulesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RulesError>;
