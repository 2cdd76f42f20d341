use std::collections::BTreeMap;
use std::path::PathBuf;

use scrub_core::{CleanedTable, TableKind};
use scrub_model::QualityReport;

#[derive(Debug)]
pub struct RunResult {
    pub project: &'static str,
    pub output_dir: PathBuf,
    pub rules_fingerprint: String,
    pub tables: Vec<TableSummary>,
    /// Records per raw source of unified tables.
    pub sources: BTreeMap<String, usize>,
    pub lineage: Option<PathBuf>,
    pub quality_report: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunResult {
    /// True when a post-clean check still found error-severity issues.
    pub fn has_errors(&self) -> bool {
        self.tables
            .iter()
            .filter_map(|summary| summary.quality.as_ref())
            .any(QualityReport::has_errors)
    }
}

#[derive(Debug)]
pub struct TableSummary {
    pub kind: TableKind,
    pub cleaned: CleanedTable,
    /// Post-clean quality report, unless the check was skipped.
    pub quality: Option<QualityReport>,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct CheckResult {
    pub project: &'static str,
    pub reports: Vec<QualityReport>,
}
