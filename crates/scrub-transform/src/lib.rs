//! Field-level transformation utilities.
//!
//! - **normalization**: pure value normalizers (categorical, email,
//!   identifier, timestamp, numeric range, duration, person, phone, IPv4)
//! - **field_rule**: [`FieldRule`], one normalizer configured for a field
//! - **derive**: [`Derivation`], fields computed from other fields

pub mod derive;
pub mod field_rule;
pub mod normalization;

pub use derive::Derivation;
pub use field_rule::FieldRule;
pub use normalization::{IdentifierFormat, NumericRange};
