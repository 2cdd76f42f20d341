//! Normalization functions for field values.
//!
//! Every normalizer is a pure `&Value -> Value` function. Invalid input
//! becomes `Null` (or a configured sentinel) rather than an error, so the
//! record survives and the problem shows up in the quality report.
//!
//! - **datetime**: multi-format timestamp parsing
//! - **duration**: free-text durations to minutes
//! - **email**: email canonicalization
//! - **identifier**: `PREFIX-NNNN` identifiers
//! - **network**: IPv4 addresses
//! - **numeric**: numeric coercion and range nulling
//! - **person**: people, placeholders and names
//! - **phone**: North American phone numbers

pub mod datetime;
pub mod duration;
pub mod email;
pub mod identifier;
pub mod network;
pub mod numeric;
pub mod person;
pub mod phone;

pub use datetime::{normalize_timestamp, parse_timestamp};
pub use duration::normalize_duration_minutes;
pub use email::{is_valid_email, normalize_email};
pub use identifier::IdentifierFormat;
pub use network::normalize_ipv4;
pub use numeric::{NumericRange, parse_f64, round_to};
pub use person::{normalize_person, normalize_person_name};
pub use phone::normalize_phone;
