//! JSON documents holding one or more tables.
//!
//! Two layouts are accepted:
//!
//! - an array of objects, read as a single table under whatever name is
//!   requested;
//! - an object mapping table names to arrays of objects.
//!
//! Strings and numbers keep their type. Booleans become text, and nested
//! arrays or objects are flattened to their JSON text so that every cell
//! stays a scalar.

use std::fs;
use std::path::{Path, PathBuf};

use scrub_model::{Record, Result, ScrubError, Table, TableSource, Value};
use serde_json::Value as Json;
use tracing::debug;

fn json_cell(value: &Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::Bool(flag) => Value::Text(flag.to_string()),
        Json::Number(number) => number.as_f64().map_or(Value::Null, Value::Number),
        Json::String(text) if text.is_empty() => Value::Null,
        Json::String(text) => Value::Text(text.clone()),
        Json::Array(_) | Json::Object(_) => Value::Text(value.to_string()),
    }
}

/// Build a table from an array of JSON objects. Columns are the union of
/// object keys in first-seen order.
pub fn table_from_json(name: &str, rows: &[Json]) -> std::result::Result<Table, String> {
    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Json::Object(object) = row else {
            return Err(format!("row {idx} of '{name}' is not an object"));
        };
        for key in object.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
        records.push(Record::from_pairs(
            object.iter().map(|(key, value)| (key.as_str(), json_cell(value))),
        ));
    }
    Ok(Table::from_records(name, columns, records))
}

/// A single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    id: String,
    document: Option<Json>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            path,
            document: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document(&mut self) -> Result<&Json> {
        if self.document.is_none() {
            let text = fs::read_to_string(&self.path)
                .map_err(|err| ScrubError::source_unavailable(&self.id, err))?;
            let parsed: Json = serde_json::from_str(&text)
                .map_err(|err| ScrubError::source_unavailable(&self.id, err))?;
            debug!(path = %self.path.display(), "parsed json document");
            self.document = Some(parsed);
        }
        self.document
            .as_ref()
            .ok_or_else(|| ScrubError::source_unavailable(&self.id, "document not loaded"))
    }
}

impl TableSource for JsonFileSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_table(&mut self, table: &str) -> Result<Table> {
        let id = self.id.clone();
        let rows = match self.document()? {
            Json::Array(rows) => rows,
            Json::Object(tables) => match tables.get(table) {
                Some(Json::Array(rows)) => rows,
                Some(_) => {
                    return Err(ScrubError::source_unavailable(
                        id,
                        format!("'{table}' is not an array"),
                    ));
                }
                None => {
                    return Err(ScrubError::source_unavailable(
                        id,
                        format!("no table '{table}'"),
                    ));
                }
            },
            _ => {
                return Err(ScrubError::source_unavailable(
                    id,
                    "expected an array or an object of arrays",
                ));
            }
        };
        let parsed = table_from_json(table, rows).map_err(|reason| ScrubError::source_unavailable(&id, reason))?;
        debug!(source = %id, table, rows = parsed.len(), "read json table");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_cells() {
        assert_eq!(json_cell(&json!(null)), Value::Null);
        assert_eq!(json_cell(&json!(42)), Value::Number(42.0));
        assert_eq!(json_cell(&json!("")), Value::Null);
        assert_eq!(json_cell(&json!(true)), Value::from("true"));
        assert_eq!(json_cell(&json!(["bug", "high"])), Value::from(r#"["bug","high"]"#));
    }

    #[test]
    fn test_columns_in_first_seen_order() {
        let rows = vec![json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})];
        let table = table_from_json("t", &rows).expect("table");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[2], "c");
        assert_eq!(table.records[1].get("c"), &Value::Number(3.0));
        assert!(table.records[0].get("c").is_null());
    }

    #[test]
    fn test_non_object_row_is_rejected() {
        let rows = vec![json!(1)];
        assert!(table_from_json("t", &rows).is_err());
    }
}
