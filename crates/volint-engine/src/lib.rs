//! Conformance-check execution for volint.
//!
//! Input: a service context (endpoint URLs plus a document fetcher) and an
//! ordered list of stages. Output: diagnostics through a reporter.
//!
//! The pieces:
//! - [`pipeline`]: the stage contract and the sequential driver
//! - [`xsd`]: XML schema validation orchestration for one document
//! - [`resolver`]: trusted local schema resolution by namespace
//! - [`ctype`]: declared-vs-permitted Content-Type compliance
//! - [`fetch`]: the blocking document fetch collaborator

#![forbid(unsafe_code)]

pub mod ctype;
pub mod fetch;
pub mod pipeline;
pub mod resolver;
pub mod stages;
pub mod test_support;
pub mod xsd;

mod context;

pub use context::ServiceContext;
pub use pipeline::{Stage, run_stages};
pub use xsd::{Outcome, XsdStage};
