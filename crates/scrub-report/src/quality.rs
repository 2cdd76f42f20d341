//! Quality report export.

use std::path::Path;

use serde::Serialize;

use scrub_model::{QualityReport, Result, ScrubError};

use crate::common::write_atomic;

/// Default location of the quality report under the output directory.
pub const QUALITY_FILE: &str = "metadata/quality_report.json";

#[derive(Serialize)]
struct QualityDocument<'a> {
    error_count: usize,
    warning_count: usize,
    tables: &'a [QualityReport],
}

/// Write the post-clean quality reports of a run as one JSON document.
pub fn write_quality_reports(reports: &[QualityReport], path: &Path) -> Result<()> {
    let document = QualityDocument {
        error_count: reports.iter().map(QualityReport::error_count).sum(),
        warning_count: reports.iter().map(QualityReport::warning_count).sum(),
        tables: reports,
    };
    let bytes =
        serde_json::to_vec_pretty(&document).map_err(|err| ScrubError::export(path, err))?;
    write_atomic(path, &bytes)
}
