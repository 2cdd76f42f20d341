use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that abort a cleaning run.
///
/// Per-record data problems (bad dates, unmapped labels, malformed ids) are
/// never errors; they become nulls or fallback labels and are counted by the
/// validator instead.
#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },
    #[error("schema mismatch in table '{table}': missing field(s) {fields}", fields = .missing.join(", "))]
    SchemaMismatch { table: String, missing: Vec<String> },
    #[error("stage '{stage}' depends on '{dependency}', which is not scheduled before it")]
    StageOrder { stage: String, dependency: String },
    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),
    #[error("stage '{stage}' increased row count from {before} to {after}")]
    RowCountIncreased {
        stage: String,
        before: usize,
        after: usize,
    },
    #[error("stage '{stage}' removed {removed} row(s) but is not allowed to remove rows")]
    RowsRemoved { stage: String, removed: usize },
    #[error("pipeline '{pipeline}' cannot finalize with {remaining} stage(s) still pending")]
    RunIncomplete { pipeline: String, remaining: usize },
    #[error("failed to export {path}: {message}")]
    Export { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrubError {
    pub fn source_unavailable(source_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn export(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
