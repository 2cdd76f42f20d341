//! Declarative data-quality rules.
//!
//! - **rule**: [`ValidationRule`], a [`Check`] on one field plus a
//!   [`Remediation`]
//! - **validator**: read-only [`Validator`] producing a `QualityReport`
//! - **remediate**: in-place application of a rule's remediation

pub mod remediate;
pub mod rule;
pub mod validator;

pub use remediate::remediate;
pub use rule::{Check, Remediation, ValidationRule};
pub use validator::{MAX_SAMPLES, Validator};
