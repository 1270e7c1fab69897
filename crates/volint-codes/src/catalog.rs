//! The closed catalogue of fixed message codes.
//!
//! Each entry pins a severity and a 4-character label, carries prose for the
//! `explain` surface, and may cite the standards document it enforces.
//! Codes synthesized at runtime live in [`crate::AdhocCode`] instead.

use crate::label::Label;
use crate::severity::ReportType;

/// Reference into a standards document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Citation {
    /// Short document name, e.g. `"TAPRegExt"`.
    pub document: &'static str,
    /// Section identifier within the document.
    pub section: &'static str,
}

/// A catalogued message code.
///
/// The catalogue is closed: every member is statically enumerable through
/// [`FixedCode::ALL`]. Identity for reporting purposes is the
/// (severity, label) pair only, shared with ad-hoc codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedCode {
    // Progress / diagnostic.
    ValidatingDocument,
    CapabilitiesUrl,
    AvailabilityNote,

    // Tolerated irregularities.
    NoContentType,
    UnknownSchemaNamespace,
    MissingOptionalDocument,
    CapabilitiesUrlForm,
    AdqlVersionUndeclared,

    // Mandatory-requirement violations.
    MissingMandatoryDocument,
    InvalidContentType,
    BadContentType,
    DocumentReadError,
    DocumentParseError,
    WrongRootElement,
    CapabilitiesReadError,
    CapabilitiesParseError,
    NoAdqlLanguage,
    MissingTapCapability,
    NoOutputFormats,
    UploadLimitInconsistent,
    BadUdfSignature,

    // Internal faults.
    StageFault,
}

impl FixedCode {
    /// Every catalogued code.
    pub const ALL: &'static [FixedCode] = &[
        FixedCode::ValidatingDocument,
        FixedCode::CapabilitiesUrl,
        FixedCode::AvailabilityNote,
        FixedCode::NoContentType,
        FixedCode::UnknownSchemaNamespace,
        FixedCode::MissingOptionalDocument,
        FixedCode::CapabilitiesUrlForm,
        FixedCode::AdqlVersionUndeclared,
        FixedCode::MissingMandatoryDocument,
        FixedCode::InvalidContentType,
        FixedCode::BadContentType,
        FixedCode::DocumentReadError,
        FixedCode::DocumentParseError,
        FixedCode::WrongRootElement,
        FixedCode::CapabilitiesReadError,
        FixedCode::CapabilitiesParseError,
        FixedCode::NoAdqlLanguage,
        FixedCode::MissingTapCapability,
        FixedCode::NoOutputFormats,
        FixedCode::UploadLimitInconsistent,
        FixedCode::BadUdfSignature,
        FixedCode::StageFault,
    ];

    pub fn report_type(self) -> ReportType {
        self.entry().0
    }

    pub fn label(self) -> Label {
        Label::new(self.entry().1)
    }

    pub fn description(self) -> &'static str {
        self.entry().2
    }

    pub fn citation(self) -> Option<Citation> {
        self.entry().3
    }

    /// Looks up a catalogue entry from user input.
    ///
    /// Accepts either the bare label (`"GONM"`) or the compound form with
    /// a severity prefix (`"E-GONM"`).
    pub fn lookup(text: &str) -> Option<FixedCode> {
        let text = text.trim();
        let (type_char, label) = match text.split_once('-') {
            Some((t, l)) if t.len() == 1 => (t.chars().next(), l),
            _ => (None, text),
        };
        FixedCode::ALL.iter().copied().find(|code| {
            code.label().as_str().eq_ignore_ascii_case(label)
                && type_char
                    .map(|c| {
                        c.eq_ignore_ascii_case(&code.report_type().display_char())
                    })
                    .unwrap_or(true)
        })
    }

    fn entry(self) -> (ReportType, &'static str, &'static str, Option<Citation>) {
        use FixedCode::*;
        use ReportType::*;
        match self {
            ValidatingDocument => (
                Info,
                "VURL",
                "Document submitted for schema validation",
                None,
            ),
            CapabilitiesUrl => (
                Info,
                "CURL",
                "Reading capability metadata",
                cite("VOSI", "3.3"),
            ),
            AvailabilityNote => (
                Info,
                "AVNO",
                "Absence of the availability endpoint is not a standards violation",
                cite("VOSI", "3.2"),
            ),
            NoContentType => (
                Warning,
                "NOCT",
                "No Content-Type header supplied with HTTP response",
                None,
            ),
            UnknownSchemaNamespace => (
                Warning,
                "UNSC",
                "Schema namespace not recognised; default resolution applies",
                None,
            ),
            MissingOptionalDocument => (
                Warning,
                "GONO",
                "Optional document is absent",
                None,
            ),
            CapabilitiesUrlForm => (
                Warning,
                "CULF",
                "Capabilities endpoint URL has a non-standard form",
                cite("TAP", "2.0"),
            ),
            AdqlVersionUndeclared => (
                Warning,
                "LVAN",
                "No version declared for the ADQL query language",
                cite("TAPRegExt", "2.3"),
            ),
            MissingMandatoryDocument => (
                Error,
                "GONM",
                "Mandatory document is absent",
                None,
            ),
            InvalidContentType => (
                Error,
                "DRCT",
                "Content-Type header cannot be parsed",
                cite("DataLink", "3.3"),
            ),
            BadContentType => (
                Error,
                "BMIM",
                "Content-Type does not match any permitted type",
                None,
            ),
            DocumentReadError => (
                Error,
                "FLIO",
                "I/O error while reading a document",
                None,
            ),
            DocumentParseError => (
                Error,
                "FLSX",
                "Error while parsing an XML document",
                None,
            ),
            WrongRootElement => (
                Error,
                "TLEL",
                "Wrong top-level document element",
                None,
            ),
            CapabilitiesReadError => (
                Error,
                "CAIO",
                "Error reading capabilities document",
                cite("VOSI", "3.3"),
            ),
            CapabilitiesParseError => (
                Error,
                "CAXM",
                "Error parsing capabilities document",
                cite("VOSI", "3.3"),
            ),
            NoAdqlLanguage => (
                Error,
                "NOQL",
                "ADQL not declared among supported query languages",
                cite("TAPRegExt", "2.3"),
            ),
            MissingTapCapability => (
                Error,
                "TCAP",
                "TAP capability not declared in capabilities document",
                cite("TAPRegExt", "2.1"),
            ),
            NoOutputFormats => (
                Error,
                "NOOF",
                "No output formats declared",
                cite("TAPRegExt", "2.4"),
            ),
            UploadLimitInconsistent => (
                Error,
                "UPBD",
                "Declared upload limits are inconsistent",
                cite("TAPRegExt", "2.4.3"),
            ),
            BadUdfSignature => (
                Error,
                "UDFE",
                "User-defined function signature has the wrong form",
                cite("TAPRegExt", "2.3.1"),
            ),
            StageFault => (
                Failure,
                "UNEX",
                "Unexpected fault while running a stage",
                None,
            ),
        }
    }
}

fn cite(document: &'static str, section: &'static str) -> Option<Citation> {
    Some(Citation { document, section })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn all_labels_are_four_characters() {
        for code in FixedCode::ALL {
            assert_eq!(code.label().as_str().len(), 4, "{code:?}");
        }
    }

    #[test]
    fn identities_are_unique_within_catalogue() {
        let keys: BTreeSet<_> = FixedCode::ALL
            .iter()
            .map(|c| (c.report_type(), c.label()))
            .collect();
        assert_eq!(keys.len(), FixedCode::ALL.len());
    }

    #[test]
    fn lookup_accepts_bare_and_compound_forms() {
        assert_eq!(
            FixedCode::lookup("GONM"),
            Some(FixedCode::MissingMandatoryDocument)
        );
        assert_eq!(
            FixedCode::lookup("E-GONM"),
            Some(FixedCode::MissingMandatoryDocument)
        );
        assert_eq!(
            FixedCode::lookup("w-gono"),
            Some(FixedCode::MissingOptionalDocument)
        );
        assert_eq!(FixedCode::lookup("E-GONO"), None);
        assert_eq!(FixedCode::lookup("ZZZZ"), None);
    }
}
