//! Delimited text tables.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use scrub_model::{Record, Result, ScrubError, Table, TableSource, Value};
use tracing::debug;

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell_value(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::Text(raw.to_string())
    }
}

fn unavailable(path: &Path, err: impl ToString) -> ScrubError {
    ScrubError::source_unavailable(path.display().to_string(), err)
}

/// Read one CSV file into a table named `name`.
///
/// Headers are trimmed (byte-order mark included) and inner whitespace is
/// collapsed. Cells keep their raw text; empty cells become `Null`. Short
/// rows are padded with `Null` and extra cells are ignored.
pub fn read_csv_table(path: &Path, name: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| unavailable(path, err))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| unavailable(path, err))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut table = Table::new(name, headers.clone());
    for record in reader.records() {
        let record = record.map_err(|err| unavailable(path, err))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.as_str(), cell_value(record.get(idx).unwrap_or(""))));
        table.push(Record::from_pairs(row));
    }
    debug!(path = %path.display(), table = name, rows = table.len(), "read csv");
    Ok(table)
}

/// Tables stored as `<dir>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
    id: String,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            id: dir.display().to_string(),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl TableSource for CsvDirectorySource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_table(&mut self, table: &str) -> Result<Table> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(ScrubError::source_unavailable(
                path.display().to_string(),
                "file not found",
            ));
        }
        read_csv_table(&path, table)
    }
}
