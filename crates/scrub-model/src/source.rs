//! Abstract tabular input.

use crate::error::Result;
use crate::table::Table;

/// A backing store that yields table snapshots by identifier.
///
/// Implementations keep field names as they appear in the source and keep
/// raw text or numeric typing; all cleaning happens downstream. Any handle the
/// source holds open is released when the source is dropped.
pub trait TableSource {
    /// Stable identifier for lineage metadata (a path, a URI, ...).
    fn source_id(&self) -> &str;

    /// Read one table. Fails with `ScrubError::SourceUnavailable` when the
    /// table cannot be read.
    fn read_table(&mut self, table: &str) -> Result<Table>;
}
