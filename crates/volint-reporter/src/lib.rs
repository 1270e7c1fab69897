//! Diagnostic delivery for volint runs.
//!
//! All stage output funnels through a [`Reporter`]. The concrete
//! [`OutputReporter`] aggregates repeat messages per compound code and
//! suppresses them past a configurable threshold; [`HoldReporter`] buffers
//! reports for later replay into a shared reporter.
//!
//! Nothing here is safe for concurrent use; the execution model is
//! single-threaded throughout.

#![forbid(unsafe_code)]

mod hold;
mod output;

pub use hold::HoldReporter;
pub use output::{OutputReporter, ReporterOptions};

use volint_codes::{Report, ReportCode};

/// Destination for diagnostic messages.
///
/// Stages only see this trait; lifecycle operations (sections, totals,
/// suppression summaries) belong to the concrete reporter driving the run.
pub trait Reporter {
    /// Delivers one report.
    fn submit(&mut self, report: Report);

    /// The code of the active section, if any.
    fn current_section(&self) -> Option<&str>;
}

/// Convenience constructors over any reporter, trait objects included.
///
/// Kept apart from [`Reporter`] so the methods can stay generic over the
/// code type while `&mut dyn Reporter` remains usable.
pub trait ReporterExt {
    /// Report a plain message.
    fn report(&mut self, code: impl Into<ReportCode>, message: &str);

    /// Report a message with its underlying cause.
    fn report_with_cause(
        &mut self,
        code: impl Into<ReportCode>,
        message: &str,
        cause: anyhow::Error,
    );
}

impl<T: Reporter + ?Sized> ReporterExt for T {
    fn report(&mut self, code: impl Into<ReportCode>, message: &str) {
        self.submit(Report::new(code, message));
    }

    fn report_with_cause(
        &mut self,
        code: impl Into<ReportCode>,
        message: &str,
        cause: anyhow::Error,
    ) {
        self.submit(Report::new(code, message).with_cause(cause));
    }
}
