#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::value::Value;

static NULL: Value = Value::Null;

/// One row: field name to scalar value. Absent fields read as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    cells: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> &Value {
        self.cells.get(field).unwrap_or(&NULL)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Value {
        self.cells.insert(field.into(), value).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.cells.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// An ordered sequence of records sharing a fixed field schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            records: Vec::new(),
        }
    }

    pub fn from_records(
        name: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            records,
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Register a (derived) column in the schema. Returns false if it
    /// already existed.
    pub fn add_column(&mut self, name: &str) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(name.to_string());
        true
    }

    /// Required fields that are absent from the schema, in the order given.
    pub fn missing_columns<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        required
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect()
    }

    pub fn column_values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |record| record.get(field))
    }

    /// Number of records whose `field` is null or a placeholder.
    pub fn missing_count(&self, field: &str) -> usize {
        self.column_values(field)
            .filter(|value| value.is_missing())
            .count()
    }

    /// Type-tagged identity of a record over `fields`. An empty field list
    /// means every column of the table (exact-duplicate identity).
    pub fn identity_key<S: AsRef<str>>(&self, record: &Record, fields: &[S]) -> Vec<String> {
        if fields.is_empty() {
            self.columns
                .iter()
                .map(|column| record.get(column).identity_key())
                .collect()
        } else {
            fields
                .iter()
                .map(|field| record.get(field.as_ref()).identity_key())
                .collect()
        }
    }

    /// Records beyond the first in each identity group.
    pub fn duplicate_count<S: AsRef<str>>(&self, fields: &[S]) -> usize {
        let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
        self.records
            .iter()
            .filter(|record| !seen.insert(self.identity_key(record, fields)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_records(
            "customers",
            vec!["id".to_string(), "name".to_string()],
            vec![
                Record::from_pairs([("id", Value::from(1.0)), ("name", Value::from("A"))]),
                Record::from_pairs([("id", Value::from(2.0)), ("name", Value::from("N/A"))]),
                Record::from_pairs([("id", Value::from(3.0))]),
            ],
        )
    }

    #[test]
    fn absent_fields_read_as_null() {
        let table = sample();
        assert!(table.records[2].get("name").is_null());
        assert_eq!(table.missing_count("name"), 2);
    }

    #[test]
    fn missing_columns_preserves_order() {
        let table = sample();
        assert_eq!(
            table.missing_columns(&["email", "id", "age"]),
            vec!["email".to_string(), "age".to_string()]
        );
    }

    #[test]
    fn add_column_is_idempotent() {
        let mut table = sample();
        assert!(table.add_column("total"));
        assert!(!table.add_column("total"));
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn duplicates_by_identity_fields() {
        let mut table = sample();
        table.push(Record::from_pairs([("id", Value::from(1.0)), ("name", Value::from("B"))]));
        assert_eq!(table.duplicate_count(&["id"]), 1);
        assert_eq!(table.duplicate_count::<&str>(&[]), 0);
        table.push(Record::from_pairs([("id", Value::from(3.0))]));
        assert_eq!(table.duplicate_count::<&str>(&[]), 1);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut record = Record::new();
        assert!(record.set("a", Value::from("x")).is_null());
        assert_eq!(record.set("a", Value::Null), Value::from("x"));
    }
}
