pub mod dedupe;
pub mod lineage;
pub mod pipeline;
pub mod profiles;
pub mod stage;

pub use dedupe::dedupe;
pub use lineage::{LineageLog, LineageRecorder, StepRecord};
pub use pipeline::{CleanedTable, CleaningPipeline, PipelineRun};
pub use profiles::{ProfileSet, TableKind, TableProfile};
pub use stage::{
    CleaningStage, DedupeStage, DeriveStage, NormalizeStage, RemediateStage, StageOutcome,
};
