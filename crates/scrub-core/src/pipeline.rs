//! Ordered execution of cleaning stages with lineage.
//!
//! A [`CleaningPipeline`] is an ordered list of stages. Running it walks a
//! small state machine:
//!
//! 1. **Loaded** - [`CleaningPipeline::start`] checks stage order and the
//!    table schema before anything is mutated.
//! 2. **Stage 1..N** - each [`PipelineRun::step`] runs exactly one stage and
//!    appends exactly one lineage record.
//! 3. **Finalized** - [`PipelineRun::finalize`] consumes the run and hands
//!    back the table and its lineage log.
//!
//! After every stage the row count is checked: it may never grow, and only
//! stages declared with `removes_rows` may shrink it.
//!
//! # Example
//!
//! ```ignore
//! use scrub_core::{CleaningPipeline, DedupeStage};
//!
//! let pipeline = CleaningPipeline::new("customers").add_stage(DedupeStage::new(["customer_id"]));
//! let cleaned = pipeline.run(table)?;
//! ```

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use scrub_model::{Result, ScrubError, Table, TableSource};
use tracing::{debug, info};

use crate::lineage::{LineageLog, LineageRecorder, StepRecord};
use crate::stage::CleaningStage;

/// The product of a finished run.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: Table,
    pub lineage: LineageLog,
    /// Row count of the input snapshot.
    pub original_rows: usize,
}

impl CleanedTable {
    pub fn removed_rows(&self) -> usize {
        self.original_rows.saturating_sub(self.table.len())
    }
}

/// An ordered pipeline of cleaning stages.
pub struct CleaningPipeline {
    name: String,
    stages: Vec<Box<dyn CleaningStage>>,
}

impl CleaningPipeline {
    /// Create an empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Add a stage to the end of the pipeline.
    #[must_use]
    pub fn add_stage(mut self, stage: impl CleaningStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push_stage(&mut self, stage: Box<dyn CleaningStage>) {
        self.stages.push(stage);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn stages(&self) -> &[Box<dyn CleaningStage>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Reject duplicate stage names and dependencies on stages that are not
    /// scheduled earlier.
    pub fn validate_order(&self) -> Result<()> {
        let mut earlier: BTreeSet<&str> = BTreeSet::new();
        for stage in &self.stages {
            for dependency in stage.depends_on() {
                if !earlier.contains(dependency.as_str()) {
                    return Err(ScrubError::StageOrder {
                        stage: stage.name().to_string(),
                        dependency: dependency.clone(),
                    });
                }
            }
            if !earlier.insert(stage.name()) {
                return Err(ScrubError::DuplicateStage(stage.name().to_string()));
            }
        }
        Ok(())
    }

    /// Union of every stage's required fields, in first-use order.
    pub fn required_fields(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut fields = Vec::new();
        for stage in &self.stages {
            for field in stage.required_fields() {
                if seen.insert(field) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// Fail with `SchemaMismatch` when the table lacks a required field.
    pub fn check_schema(&self, table: &Table) -> Result<()> {
        let missing = table.missing_columns(self.required_fields().as_slice());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScrubError::SchemaMismatch {
                table: table.name.clone(),
                missing,
            })
        }
    }

    /// Begin a run over `table`. Nothing is mutated when this fails.
    pub fn start(&self, table: Table) -> Result<PipelineRun<'_>> {
        self.validate_order()?;
        self.check_schema(&table)?;
        debug!(
            pipeline = %self.name,
            stages = self.stages.len(),
            rows = table.len(),
            "starting run"
        );
        Ok(PipelineRun {
            pipeline: self,
            original_rows: table.len(),
            table,
            recorder: LineageRecorder::new(),
            next: 0,
        })
    }

    /// Run every stage in order.
    pub fn run(&self, table: Table) -> Result<CleanedTable> {
        let mut run = self.start(table)?;
        while run.step()?.is_some() {}
        run.finalize()
    }

    /// Run every stage, consulting `checkpoint` after each lineage record.
    ///
    /// Returning `ControlFlow::Break` stops the run before the next stage;
    /// the stopped run is reported as `RunIncomplete`.
    pub fn run_with_checkpoint<F>(&self, table: Table, mut checkpoint: F) -> Result<CleanedTable>
    where
        F: FnMut(&StepRecord, &Table) -> ControlFlow<()>,
    {
        let mut run = self.start(table)?;
        while let Some(record) = run.step()? {
            let record = record.clone();
            if checkpoint(&record, run.table()).is_break() {
                info!(
                    pipeline = %self.name,
                    step = record.step(),
                    "run stopped at checkpoint"
                );
                break;
            }
        }
        run.finalize()
    }

    /// Read a snapshot from `source`, then run every stage on it.
    pub fn run_source(&self, source: &mut dyn TableSource, table_id: &str) -> Result<CleanedTable> {
        self.validate_order()?;
        let table = source.read_table(table_id)?;
        debug!(
            source = source.source_id(),
            table = table_id,
            rows = table.len(),
            "read snapshot"
        );
        self.run(table)
    }
}

impl std::fmt::Debug for CleaningPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleaningPipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// A run in progress. Dropping it discards the partially cleaned table.
#[derive(Debug)]
pub struct PipelineRun<'p> {
    pipeline: &'p CleaningPipeline,
    table: Table,
    recorder: LineageRecorder,
    original_rows: usize,
    next: usize,
}

impl PipelineRun<'_> {
    /// Run the next stage and record it. Returns `None` once every stage has
    /// run.
    pub fn step(&mut self) -> Result<Option<&StepRecord>> {
        let pipeline = self.pipeline;
        let Some(stage) = pipeline.stages.get(self.next) else {
            return Ok(None);
        };
        let before = self.table.len();
        let outcome = stage.apply(&mut self.table);
        let after = self.table.len();
        check_row_count(stage.as_ref(), before, after)?;
        self.next += 1;

        info!(
            pipeline = %pipeline.name,
            stage = stage.name(),
            rows_before = before,
            rows_after = after,
            affected = outcome.affected,
            "stage complete"
        );
        let record = self
            .recorder
            .record(outcome.description, outcome.details, outcome.reason);
        Ok(Some(record))
    }

    /// Name of the stage `step` will run next.
    pub fn next_stage(&self) -> Option<&str> {
        self.pipeline.stages.get(self.next).map(|stage| stage.name())
    }

    pub fn remaining(&self) -> usize {
        self.pipeline.stages.len() - self.next
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn log(&self) -> &LineageLog {
        self.recorder.log()
    }

    /// Hand back the cleaned table and its lineage. Fails while stages remain.
    pub fn finalize(self) -> Result<CleanedTable> {
        let remaining = self.remaining();
        if remaining > 0 {
            return Err(ScrubError::RunIncomplete {
                pipeline: self.pipeline.name.clone(),
                remaining,
            });
        }
        info!(
            pipeline = %self.pipeline.name,
            original = self.original_rows,
            cleaned = self.table.len(),
            steps = self.recorder.len(),
            "run finalized"
        );
        Ok(CleanedTable {
            table: self.table,
            lineage: self.recorder.into_log(),
            original_rows: self.original_rows,
        })
    }
}

fn check_row_count(stage: &dyn CleaningStage, before: usize, after: usize) -> Result<()> {
    if after > before {
        return Err(ScrubError::RowCountIncreased {
            stage: stage.name().to_string(),
            before,
            after,
        });
    }
    if after < before && !stage.removes_rows() {
        return Err(ScrubError::RowsRemoved {
            stage: stage.name().to_string(),
            removed: before - after,
        });
    }
    Ok(())
}
