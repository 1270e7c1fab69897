use crate::code::ReportCode;

/// One diagnostic message.
///
/// Immutable once built: a report is emitted exactly once and is never
/// merged with another report, though it may be buffered before delivery.
#[derive(Debug)]
pub struct Report {
    code: ReportCode,
    message: String,
    cause: Option<anyhow::Error>,
}

impl Report {
    pub fn new(code: impl Into<ReportCode>, message: impl Into<String>) -> Report {
        Report {
            code: code.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the underlying fault that prompted this report.
    pub fn with_cause(mut self, cause: anyhow::Error) -> Report {
        self.cause = Some(cause);
        self
    }

    pub fn code(&self) -> ReportCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }
}
