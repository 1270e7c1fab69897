//! Use case orchestration for volint.
//!
//! This crate provides the application layer: use cases that coordinate
//! settings, the engine, and the reporter. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;

pub use check::{CheckInput, CheckOutput, Totals, run_check, run_check_against, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
