use crate::catalog::FixedCode;
use crate::label::Label;
use crate::severity::ReportType;

/// A code synthesized at runtime when nothing in the catalogue fits,
/// typically to wrap messages from a foreign sub-validator.
///
/// Carries only a severity and a hash-derived label; the seed text is not
/// retained. Two ad-hoc codes with the same (severity, label) pair are
/// indistinguishable even if derived from different seeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AdhocCode {
    rtype: ReportType,
    label: Label,
}

impl AdhocCode {
    /// Synthesizes a code with a label derived from arbitrary seed text.
    pub fn derived(rtype: ReportType, seed: &str) -> AdhocCode {
        AdhocCode {
            rtype,
            label: Label::derived(seed),
        }
    }

    /// Synthesizes a code with an explicit label.
    pub fn with_label(rtype: ReportType, label: Label) -> AdhocCode {
        AdhocCode { rtype, label }
    }

    pub fn report_type(self) -> ReportType {
        self.rtype
    }

    pub fn label(self) -> Label {
        self.label
    }
}

/// A message code: either a member of the closed catalogue or a
/// runtime-synthesized one.
///
/// Equality and hashing consider only the (severity, label) identity, so a
/// fixed code and an ad-hoc code that happen to share both compare equal.
#[derive(Clone, Copy, Debug)]
pub enum ReportCode {
    Fixed(FixedCode),
    Adhoc(AdhocCode),
}

impl ReportCode {
    pub fn report_type(self) -> ReportType {
        match self {
            ReportCode::Fixed(c) => c.report_type(),
            ReportCode::Adhoc(c) => c.report_type(),
        }
    }

    pub fn label(self) -> Label {
        match self {
            ReportCode::Fixed(c) => c.label(),
            ReportCode::Adhoc(c) => c.label(),
        }
    }
}

impl PartialEq for ReportCode {
    fn eq(&self, other: &Self) -> bool {
        self.report_type() == other.report_type() && self.label() == other.label()
    }
}

impl Eq for ReportCode {}

impl std::hash::Hash for ReportCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.report_type().hash(state);
        self.label().hash(state);
    }
}

impl From<FixedCode> for ReportCode {
    fn from(code: FixedCode) -> ReportCode {
        ReportCode::Fixed(code)
    }
}

impl From<AdhocCode> for ReportCode {
    fn from(code: AdhocCode) -> ReportCode {
        ReportCode::Adhoc(code)
    }
}
