//! Library side of the `scrub` command: logging setup and run orchestration.

pub mod logging;
pub mod pipeline;
pub mod types;
