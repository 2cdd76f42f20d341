//! Run orchestration shared by the `run` and `check` commands.
//!
//! Every selected table is read and schema-checked before any stage runs,
//! so a missing source or column fails the whole command up front.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use scrub_core::{ProfileSet, TableKind, TableProfile};
use scrub_ingest::{BUG_REPORT_COLUMNS, DirectorySource, bug_tracker_mappings, read_unified};
use scrub_model::{Table, TableSource};
use scrub_report::{
    ExportFormat, LINEAGE_FILE, LineageDocument, QUALITY_FILE, export_table, write_lineage,
    write_quality_reports,
};
use scrub_rules::{RuleRegistry, resolve_rules_path};

use crate::types::{CheckResult, RunResult, TableSummary};

/// Inputs of a `run` command.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub profile: ProfileSet,
    /// Restrict the run to these table names; empty means all.
    pub tables: Vec<String>,
    pub format: ExportFormat,
    pub dry_run: bool,
    pub post_check: bool,
    pub rules: Option<PathBuf>,
}

/// A raw table loaded for its profile.
#[derive(Debug)]
pub struct LoadedTable {
    pub profile: TableProfile,
    pub table: Table,
    pub sources: BTreeMap<String, usize>,
}

/// Load `--rules`, `SCRUB_RULES`, or the embedded rule set.
pub fn load_rules(explicit: Option<&Path>) -> Result<RuleRegistry> {
    let path = resolve_rules_path(explicit);
    let registry = RuleRegistry::load_or_builtin(path.as_deref()).context("load rules")?;
    info!(
        origin = registry.origin(),
        tables = registry.len(),
        fingerprint = registry.fingerprint(),
        "rules loaded"
    );
    Ok(registry)
}

/// Table kinds of `profile`, narrowed to `filter` when it is non-empty.
pub fn selected_kinds(profile: ProfileSet, filter: &[String]) -> Result<Vec<TableKind>> {
    let available = profile.tables();
    for name in filter {
        if !available.iter().any(|kind| kind.name() == name) {
            let names: Vec<&str> = available.iter().map(|kind| kind.name()).collect();
            bail!(
                "unknown table '{name}' for this profile (expected one of: {})",
                names.join(", ")
            );
        }
    }
    Ok(available
        .iter()
        .copied()
        .filter(|kind| filter.is_empty() || filter.iter().any(|name| name == kind.name()))
        .collect())
}

/// Read the raw table for `kind`.
///
/// Bug reports are unified from the tracker exports; every other kind is a
/// single `<table>.csv` or `<table>.json` file.
pub fn read_input(
    source: &mut DirectorySource,
    kind: TableKind,
) -> scrub_model::Result<(Table, BTreeMap<String, usize>)> {
    match kind {
        TableKind::BugReports => {
            let unified = read_unified(
                source,
                kind.name(),
                BUG_REPORT_COLUMNS,
                &bug_tracker_mappings(),
            )?;
            Ok((unified.table, unified.counts))
        }
        _ => Ok((source.read_table(kind.name())?, BTreeMap::new())),
    }
}

/// Build profiles and read every selected table, checking each schema.
pub fn load_tables(
    input_dir: &Path,
    registry: &RuleRegistry,
    kinds: &[TableKind],
) -> Result<Vec<LoadedTable>> {
    let mut source = DirectorySource::new(input_dir);
    let mut loaded = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let profile = kind
            .profile(registry)
            .with_context(|| format!("build {kind} profile"))?;
        let (table, sources) =
            read_input(&mut source, kind).with_context(|| format!("read {kind}"))?;
        profile
            .pipeline
            .validate_order()
            .and_then(|()| profile.pipeline.check_schema(&table))
            .with_context(|| format!("prepare {kind}"))?;
        info!(table = %kind, records = table.len(), source = source.source_id(), "loaded table");
        loaded.push(LoadedTable {
            profile,
            table,
            sources,
        });
    }
    Ok(loaded)
}

pub fn run(options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", input = %options.input_dir.display());
    let _guard = span.enter();
    let started = Instant::now();

    let registry = load_rules(options.rules.as_deref())?;
    let kinds = selected_kinds(options.profile, &options.tables)?;
    let loaded = load_tables(&options.input_dir, &registry, &kinds)?;

    let mut document = LineageDocument::new(
        options.profile.project(),
        options.input_dir.display().to_string(),
        registry.fingerprint(),
    );
    let mut sources = BTreeMap::new();
    let mut tables = Vec::with_capacity(loaded.len());
    for LoadedTable {
        profile,
        table,
        sources: table_sources,
    } in loaded
    {
        let kind = profile.kind;
        let cleaned = profile
            .pipeline
            .run(table)
            .with_context(|| format!("clean {kind}"))?;
        let quality = options
            .post_check
            .then(|| profile.validator.validate(&cleaned.table));
        let outputs = if options.dry_run {
            Vec::new()
        } else {
            export_table(&cleaned.table, &options.output_dir, options.format)
                .with_context(|| format!("export {kind}"))?
        };
        document.add_table(&cleaned);
        sources.extend(table_sources);
        tables.push(TableSummary {
            kind,
            cleaned,
            quality,
            outputs,
        });
    }
    let document = document.with_sources(sources.clone());

    let (lineage, quality_report) = if options.dry_run {
        (None, None)
    } else {
        let lineage_path = options.output_dir.join(LINEAGE_FILE);
        write_lineage(&document, &lineage_path).context("write lineage")?;
        let reports: Vec<_> = tables
            .iter()
            .filter_map(|summary| summary.quality.clone())
            .collect();
        let quality_path = if reports.is_empty() {
            None
        } else {
            let path = options.output_dir.join(QUALITY_FILE);
            write_quality_reports(&reports, &path).context("write quality report")?;
            Some(path)
        };
        (Some(lineage_path), quality_path)
    };

    info!(
        tables = tables.len(),
        steps = document.cleaning_steps.len(),
        dry_run = options.dry_run,
        duration_ms = started.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        project: options.profile.project(),
        output_dir: options.output_dir.clone(),
        rules_fingerprint: registry.fingerprint().to_string(),
        tables,
        sources,
        lineage,
        quality_report,
        dry_run: options.dry_run,
    })
}

/// Validate raw tables without cleaning or writing anything.
pub fn check(
    input_dir: &Path,
    profile: ProfileSet,
    filter: &[String],
    rules: Option<&Path>,
) -> Result<CheckResult> {
    let registry = load_rules(rules)?;
    let kinds = selected_kinds(profile, filter)?;
    let mut source = DirectorySource::new(input_dir);
    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let table_profile = kind
            .profile(&registry)
            .with_context(|| format!("build {kind} profile"))?;
        let (table, _) = read_input(&mut source, kind).with_context(|| format!("read {kind}"))?;
        reports.push(table_profile.validator.validate(&table));
    }
    Ok(CheckResult {
        project: profile.project(),
        reports,
    })
}
