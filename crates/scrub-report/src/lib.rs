//! Output generation for cleaning runs.
//!
//! - **Tables**: cleaned tables as CSV and JSON (records orientation)
//! - **Lineage**: the run's audit trail as a single JSON document
//! - **Quality**: validator findings as JSON

mod common;
mod export;
mod lineage;
mod quality;

pub use common::write_atomic;
pub use export::{ExportFormat, export_table, output_stem, write_csv, write_json};
pub use lineage::{LINEAGE_FILE, LineageDocument, LineageEntry, RecordCounts, write_lineage};
pub use quality::{QUALITY_FILE, write_quality_reports};
