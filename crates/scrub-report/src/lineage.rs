//! Lineage document for one run.
//!
//! The document is rewritten in full on every run. Step numbers restart at 1
//! for each table, so each table's entries are a gapless `1..N` sequence in
//! execution order.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use scrub_core::{CleanedTable, StepRecord};
use scrub_model::{Result, ScrubError};

use crate::common::write_atomic;

/// Default location of the lineage document under the output directory.
pub const LINEAGE_FILE: &str = "metadata/data_lineage.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub original: usize,
    pub cleaned: usize,
    pub removed: usize,
}

/// A step record tagged with the table it ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageEntry {
    pub table: String,
    #[serde(flatten)]
    pub step: StepRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineageDocument {
    pub project: String,
    /// Identifier of the input source.
    pub source: String,
    pub generated_at: String,
    pub rules_fingerprint: String,
    /// Records contributed by each raw source, for unified tables.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, usize>,
    pub record_counts: BTreeMap<String, RecordCounts>,
    pub cleaning_steps: Vec<LineageEntry>,
}

impl LineageDocument {
    pub fn new(
        project: impl Into<String>,
        source: impl Into<String>,
        rules_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            source: source.into(),
            generated_at: format_timestamp(Utc::now()),
            rules_fingerprint: rules_fingerprint.into(),
            sources: BTreeMap::new(),
            record_counts: BTreeMap::new(),
            cleaning_steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = format_timestamp(at);
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: BTreeMap<String, usize>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Add a finished table's counts and steps.
    pub fn add_table(&mut self, cleaned: &CleanedTable) {
        let name = cleaned.table.name.clone();
        self.record_counts.insert(
            name.clone(),
            RecordCounts {
                original: cleaned.original_rows,
                cleaned: cleaned.table.len(),
                removed: cleaned.removed_rows(),
            },
        );
        self.cleaning_steps
            .extend(cleaned.lineage.iter().map(|step| LineageEntry {
                table: name.clone(),
                step: step.clone(),
            }));
    }

    /// Steps recorded for one table.
    pub fn steps_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a StepRecord> + 'a {
        self.cleaning_steps
            .iter()
            .filter(move |entry| entry.table == table)
            .map(|entry| &entry.step)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Write (overwrite) the lineage document at `path`.
pub fn write_lineage(document: &LineageDocument, path: &Path) -> Result<()> {
    let json = document
        .to_json()
        .map_err(|err| ScrubError::export(path, err))?;
    write_atomic(path, json.as_bytes())?;
    info!(
        path = %path.display(),
        tables = document.record_counts.len(),
        steps = document.cleaning_steps.len(),
        "wrote lineage"
    );
    Ok(())
}
