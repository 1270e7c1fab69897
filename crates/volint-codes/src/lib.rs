//! Stable report taxonomy used across the volint workspace.
//!
//! This crate is intentionally boring:
//! - the closed severity set used to classify every diagnostic
//! - 4-character message labels, fixed (catalogued) and ad-hoc (hash-derived)
//! - the immutable `Report` value that flows into a reporter

#![forbid(unsafe_code)]

pub mod catalog;
pub mod label;
pub mod report;
pub mod severity;

mod code;

pub use catalog::{Citation, FixedCode};
pub use code::{AdhocCode, ReportCode};
pub use label::Label;
pub use report::Report;
pub use severity::ReportType;

#[cfg(test)]
mod proptests;
