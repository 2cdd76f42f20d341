//! Input directory discovery.

use std::path::{Path, PathBuf};

use scrub_model::{Result, ScrubError, Table, TableSource};

use crate::csv_source::read_csv_table;
use crate::json_source::JsonFileSource;

/// File extensions recognised as tables, in lookup order.
pub const TABLE_EXTENSIONS: &[&str] = &["csv", "json"];

/// Lists table names (file stems) in a directory.
///
/// Only files with a recognised extension are listed. Returns names sorted
/// and deduplicated; a table present as both CSV and JSON is listed once.
pub fn list_tables(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(ScrubError::source_unavailable(
            dir.display().to_string(),
            "directory not found",
        ));
    }
    let entries = std::fs::read_dir(dir)
        .map_err(|err| ScrubError::source_unavailable(dir.display().to_string(), err))?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| ScrubError::source_unavailable(dir.display().to_string(), err))?
            .path();
        if !path.is_file() {
            continue;
        }
        let recognised = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TABLE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));
        if let (true, Some(stem)) = (recognised, path.file_stem().and_then(|s| s.to_str())) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Tables stored as `<dir>/<table>.csv` or, failing that,
/// `<dir>/<table>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    id: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            id: dir.display().to_string(),
            dir,
        }
    }

    /// Path that `read_table` would use, if any file exists.
    pub fn resolve(&self, table: &str) -> Option<PathBuf> {
        TABLE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{table}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl TableSource for DirectorySource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_table(&mut self, table: &str) -> Result<Table> {
        let Some(path) = self.resolve(table) else {
            return Err(ScrubError::source_unavailable(
                &self.id,
                format!("no {table}.csv or {table}.json"),
            ));
        };
        if path.extension().is_some_and(|ext| ext == "json") {
            JsonFileSource::new(path).read_table(table)
        } else {
            read_csv_table(&path, table)
        }
    }
}
