//! Cleaned table export.

use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use scrub_model::{Record, Result, ScrubError, Table};

use crate::common::write_atomic;

/// Which table files a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn writes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

/// File stem for a cleaned table (`orders` -> `clean_orders`).
pub fn output_stem(table: &str) -> String {
    format!("clean_{table}")
}

/// Write `table` as CSV with a header row in column order.
///
/// Nulls are written as empty cells and timestamps in ISO form.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .map_err(|err| ScrubError::export(path, err))?;
    for record in &table.records {
        writer
            .write_record(table.columns.iter().map(|column| record.get(column).to_string()))
            .map_err(|err| ScrubError::export(path, err))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ScrubError::export(path, err))?;
    write_atomic(path, &bytes)
}

/// One record serialized as an object in the table's column order.
struct Row<'a> {
    columns: &'a [String],
    record: &'a Record,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column, self.record.get(column))?;
        }
        map.end()
    }
}

/// Write `table` as a pretty-printed JSON array of objects.
pub fn write_json(table: &Table, path: &Path) -> Result<()> {
    let rows: Vec<Row<'_>> = table
        .records
        .iter()
        .map(|record| Row {
            columns: &table.columns,
            record,
        })
        .collect();
    let bytes = serde_json::to_vec_pretty(&rows).map_err(|err| ScrubError::export(path, err))?;
    write_atomic(path, &bytes)
}

/// Write `table` into `dir` in the requested formats and return the paths
/// written.
pub fn export_table(table: &Table, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>> {
    let stem = output_stem(&table.name);
    let mut written = Vec::new();
    if format.writes_csv() {
        let path = dir.join(format!("{stem}.csv"));
        write_csv(table, &path)?;
        written.push(path);
    }
    if format.writes_json() {
        let path = dir.join(format!("{stem}.json"));
        write_json(table, &path)?;
        written.push(path);
    }
    info!(table = %table.name, records = table.len(), files = written.len(), "exported table");
    Ok(written)
}
