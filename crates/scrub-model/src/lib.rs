pub mod error;
pub mod quality;
pub mod source;
pub mod table;
pub mod value;

pub use error::{Result, ScrubError};
pub use quality::{QualityIssue, QualityReport, Severity};
pub use source::TableSource;
pub use table::{Record, Table};
pub use value::{PLACEHOLDER_TOKENS, TIMESTAMP_FORMAT, Value, is_placeholder};
