use std::collections::BTreeMap;

use scrub_model::{Result, ScrubError, Table, TableSource};

/// Tables held in memory, keyed by name. Reads return copies, so the same
/// snapshot can be cleaned repeatedly.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    id: String,
    tables: BTreeMap<String, Table>,
}

impl InMemorySource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Add a table under its own name.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name.clone(), table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl TableSource for InMemorySource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_table(&mut self, table: &str) -> Result<Table> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| ScrubError::source_unavailable(&self.id, format!("no table '{table}'")))
    }
}
