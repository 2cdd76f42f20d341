pub mod csv_source;
pub mod directory;
pub mod json_source;
pub mod memory;
pub mod presets;
pub mod unify;

pub use csv_source::{CsvDirectorySource, read_csv_table};
pub use directory::{DirectorySource, TABLE_EXTENSIONS, list_tables};
pub use json_source::{JsonFileSource, table_from_json};
pub use memory::InMemorySource;
pub use presets::{BUG_REPORT_COLUMNS, bug_tracker_mappings};
pub use unify::{FieldSource, SourceMapping, UnifiedTable, read_unified, unify_sources};
