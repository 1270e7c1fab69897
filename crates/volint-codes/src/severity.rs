use serde::{Deserialize, Serialize};

/// Severity of a reported message.
///
/// The set is closed and ordered; the ordering is the one used when listing
/// per-type totals at the end of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Run-level aggregate output, not a finding.
    Summary,
    /// Progress or diagnostic information, non-evaluative.
    Info,
    /// Discouraged-but-tolerated pattern, or a missing optional resource.
    Warning,
    /// Violation of a mandatory standard requirement.
    Error,
    /// Unexpected internal fault; aborts the current stage, not the run.
    Failure,
}

impl ReportType {
    /// Every severity, in totals order.
    pub const ALL: [ReportType; 5] = [
        ReportType::Summary,
        ReportType::Info,
        ReportType::Warning,
        ReportType::Error,
        ReportType::Failure,
    ];

    /// Single display character used as the first element of a compound code.
    pub fn display_char(self) -> char {
        match self {
            ReportType::Summary => 'S',
            ReportType::Info => 'I',
            ReportType::Warning => 'W',
            ReportType::Error => 'E',
            ReportType::Failure => 'F',
        }
    }

    /// Upper-case name used in the totals line.
    pub fn name(self) -> &'static str {
        match self {
            ReportType::Summary => "SUMMARY",
            ReportType::Info => "INFO",
            ReportType::Warning => "WARNING",
            ReportType::Error => "ERROR",
            ReportType::Failure => "FAILURE",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
