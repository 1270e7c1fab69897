//! XML schema validation orchestration for one service document.
//!
//! The heavy grammar work is out of scope here; this module fetches a
//! document, drives a namespace-aware parse over it, fans the parse events
//! out to observers, routes schema lookups through the trusted resolver,
//! and classifies the result as VALID / INVALID / NOT_FOUND.

use crate::context::ServiceContext;
use crate::ctype::{ContentType, ContentTypeOptions};
use crate::fetch::Fetch;
use crate::pipeline::Stage;
use crate::resolver::{ResourceKind, SchemaResolver};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use volint_codes::{AdhocCode, FixedCode, ReportType};
use volint_reporter::{Reporter, ReporterExt};

/// Result of validating one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
    /// The document could not be retrieved. Whether that is an ERROR or a
    /// WARNING is for the caller to decide, based on whether the resource
    /// is mandatory.
    NotFound,
}

/// Severity as declared by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueSeverity {
    Warning,
    Error,
    Fatal,
}

/// One parser-level problem, with location when the parser supplies one.
#[derive(Clone, Debug)]
pub struct ParseIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

/// The document's top-level element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootElement {
    pub local: String,
    pub namespace: Option<String>,
}

/// Expected top-level element of a document under validation.
#[derive(Clone, Debug)]
pub struct ExpectedRoot {
    pub local: &'static str,
    pub namespace: &'static str,
}

/// Receives parse events during validation.
///
/// Observers are invoked in their declared order for every event; delivery
/// is fail-fast, so a fault in an earlier observer prevents delivery to
/// later ones and aborts the stage.
pub trait ParseObserver {
    fn document_started(
        &mut self,
        reporter: &mut dyn Reporter,
        root: &RootElement,
    ) -> anyhow::Result<()> {
        let _ = (reporter, root);
        Ok(())
    }

    fn issue(&mut self, reporter: &mut dyn Reporter, issue: &ParseIssue) -> anyhow::Result<()> {
        let _ = (reporter, issue);
        Ok(())
    }
}

/// Converts parse issues into reports at the corresponding severity.
///
/// There is no fixed code for an arbitrary parser message, so the code is
/// synthesized from the message text; identical messages share a code and
/// therefore aggregate.
pub struct IssueReportAdapter;

impl ParseObserver for IssueReportAdapter {
    fn issue(&mut self, reporter: &mut dyn Reporter, issue: &ParseIssue) -> anyhow::Result<()> {
        let rtype = match issue.severity {
            IssueSeverity::Warning => ReportType::Warning,
            IssueSeverity::Error | IssueSeverity::Fatal => ReportType::Error,
        };
        let code = AdhocCode::derived(rtype, &issue.message);
        let mut message = issue.message.clone();
        if let (Some(line), Some(column)) = (issue.line, issue.column) {
            message.push_str(&format!(" (l.{line}, c.{column})"));
        }
        reporter.report(code, &message);
        Ok(())
    }
}

/// Checks that the document element is the one the standard requires.
pub struct RootElementCheck {
    expected: ExpectedRoot,
    seen: Option<RootElement>,
}

impl RootElementCheck {
    pub fn new(expected: ExpectedRoot) -> RootElementCheck {
        RootElementCheck {
            expected,
            seen: None,
        }
    }

    pub fn seen(&self) -> Option<&RootElement> {
        self.seen.as_ref()
    }
}

impl ParseObserver for RootElementCheck {
    fn document_started(
        &mut self,
        reporter: &mut dyn Reporter,
        root: &RootElement,
    ) -> anyhow::Result<()> {
        self.seen = Some(root.clone());
        if root.local != self.expected.local {
            reporter.report(
                FixedCode::WrongRootElement,
                &format!(
                    "Wrong top-level element name ({} != {})",
                    root.local, self.expected.local
                ),
            );
        } else if root.namespace.as_deref() != Some(self.expected.namespace) {
            reporter.report(
                FixedCode::WrongRootElement,
                &format!(
                    "Wrong top-level element namespace ({} != {})",
                    root.namespace.as_deref().unwrap_or("(none)"),
                    self.expected.namespace
                ),
            );
        }
        Ok(())
    }
}

/// Parses `body` and classifies it as [`Outcome::Valid`] or
/// [`Outcome::Invalid`].
///
/// Every namespace declared in the document is looked up through the
/// resolver, so known standard namespaces validate against the bundled
/// schema text and unknown ones degrade to a WARNING plus fallback
/// resolution. Parse events go to `observers` in order, fail-fast.
pub fn validate_document(
    reporter: &mut dyn Reporter,
    resolver: &SchemaResolver,
    body: &[u8],
    observers: &mut [&mut dyn ParseObserver],
) -> anyhow::Result<Outcome> {
    let mut reader = NsReader::from_reader(body);
    let mut buf = Vec::new();
    let mut namespaces: Vec<String> = Vec::new();
    let mut fault_count = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((resolution, Event::Start(element))) => {
                record_namespaces(&element, &mut namespaces);
                if !seen_root {
                    seen_root = true;
                    let root = root_element(&resolution, element.local_name().as_ref());
                    deliver_started(observers, reporter, &root)?;
                }
            }
            Ok((resolution, Event::Empty(element))) => {
                record_namespaces(&element, &mut namespaces);
                if !seen_root {
                    seen_root = true;
                    let root = root_element(&resolution, element.local_name().as_ref());
                    deliver_started(observers, reporter, &root)?;
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(err) => {
                let (line, column) = line_col(body, reader.buffer_position());
                let issue = ParseIssue {
                    severity: IssueSeverity::Fatal,
                    message: err.to_string(),
                    line: Some(line),
                    column: Some(column),
                };
                fault_count += 1;
                deliver_issue(observers, reporter, &issue)?;
                // quick-xml does not recover from malformed markup.
                break;
            }
        }
        buf.clear();
    }

    if !seen_root && fault_count == 0 {
        let issue = ParseIssue {
            severity: IssueSeverity::Fatal,
            message: "No document element".to_string(),
            line: None,
            column: None,
        };
        fault_count += 1;
        deliver_issue(observers, reporter, &issue)?;
    }

    for namespace in &namespaces {
        resolver.resolve(reporter, ResourceKind::Schema, namespace);
    }

    Ok(if fault_count > 0 {
        Outcome::Invalid
    } else {
        Outcome::Valid
    })
}

fn deliver_started(
    observers: &mut [&mut dyn ParseObserver],
    reporter: &mut dyn Reporter,
    root: &RootElement,
) -> anyhow::Result<()> {
    for observer in observers.iter_mut() {
        observer.document_started(reporter, root)?;
    }
    Ok(())
}

fn deliver_issue(
    observers: &mut [&mut dyn ParseObserver],
    reporter: &mut dyn Reporter,
    issue: &ParseIssue,
) -> anyhow::Result<()> {
    for observer in observers.iter_mut() {
        observer.issue(reporter, issue)?;
    }
    Ok(())
}

fn root_element(resolution: &ResolveResult<'_>, local: &[u8]) -> RootElement {
    let namespace = match resolution {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };
    RootElement {
        local: String::from_utf8_lossy(local).into_owned(),
        namespace,
    }
}

fn record_namespaces(element: &quick_xml::events::BytesStart<'_>, out: &mut Vec<String>) {
    for attribute in element.attributes().flatten() {
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let value = String::from_utf8_lossy(&attribute.value).into_owned();
            if !value.is_empty() && !out.contains(&value) {
                out.push(value);
            }
        }
    }
}

/// 1-based line and column for a byte offset.
fn line_col(body: &[u8], offset: usize) -> (usize, usize) {
    let offset = offset.min(body.len());
    let mut line = 1;
    let mut last_newline = 0;
    for (i, &b) in body[..offset].iter().enumerate() {
        if b == b'\n' {
            line += 1;
            last_newline = i + 1;
        }
    }
    (line, offset - last_newline + 1)
}

fn xml_content_types() -> ContentTypeOptions {
    ContentTypeOptions::new(vec![
        ContentType::new("text", "xml"),
        ContentType::new("application", "xml"),
    ])
}

/// Stage that validates one service document against its XML schema.
///
/// Announces the document, fetches it, checks the declared Content-Type,
/// runs [`validate_document`] with the standard observers, and records the
/// tri-state outcome. A missing document is an ERROR for a mandatory
/// resource and a WARNING for an optional one, under distinct codes so
/// downstream summaries can tell them apart.
pub struct XsdStage {
    code: &'static str,
    description: &'static str,
    endpoint: &'static str,
    expected: ExpectedRoot,
    mandatory: bool,
    missing_note: Option<(FixedCode, &'static str)>,
    resolver: SchemaResolver,
    outcome: Option<Outcome>,
}

impl XsdStage {
    pub fn new(
        code: &'static str,
        description: &'static str,
        endpoint: &'static str,
        expected: ExpectedRoot,
        mandatory: bool,
    ) -> XsdStage {
        XsdStage {
            code,
            description,
            endpoint,
            expected,
            mandatory,
            missing_note: None,
            resolver: SchemaResolver::bundled(),
            outcome: None,
        }
    }

    /// Adds a follow-up report emitted after the missing-document warning.
    pub fn with_missing_note(mut self, code: FixedCode, note: &'static str) -> XsdStage {
        self.missing_note = Some((code, note));
        self
    }

    /// Outcome of the last run, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn resolver(&self) -> &SchemaResolver {
        &self.resolver
    }
}

impl Stage for XsdStage {
    fn code(&self) -> &'static str {
        self.code
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn run(&mut self, reporter: &mut dyn Reporter, ctx: &ServiceContext) -> anyhow::Result<()> {
        self.outcome = None;
        let url = ctx.endpoint(self.endpoint)?;
        reporter.report(
            FixedCode::ValidatingDocument,
            &format!(
                "Validating {url} as {} ({})",
                self.expected.local, self.expected.namespace
            ),
        );

        let document = match ctx.fetcher().fetch(&url) {
            Ok(Fetch::Document(document)) => Some(document),
            Ok(Fetch::Missing) => None,
            Err(fault) => {
                reporter.report_with_cause(
                    FixedCode::DocumentReadError,
                    &format!("Error reading {url}"),
                    fault.into(),
                );
                None
            }
        };

        let outcome = match document {
            Some(document) => {
                xml_content_types().check_type(reporter, document.content_type.as_deref(), &url);
                let mut adapter = IssueReportAdapter;
                let mut root_check = RootElementCheck::new(self.expected.clone());
                let mut observers: [&mut dyn ParseObserver; 2] = [&mut adapter, &mut root_check];
                validate_document(reporter, &self.resolver, &document.body, &mut observers)?
            }
            None => Outcome::NotFound,
        };
        self.outcome = Some(outcome);

        if outcome == Outcome::NotFound {
            if self.mandatory {
                reporter.report(
                    FixedCode::MissingMandatoryDocument,
                    &format!("Mandatory document {url} is absent"),
                );
            } else {
                reporter.report(
                    FixedCode::MissingOptionalDocument,
                    &format!("Optional document {url} is absent"),
                );
                if let Some((code, note)) = self.missing_note {
                    reporter.report(code, note);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages;
    use crate::test_support::{AVAILABILITY_XML, StubFetcher, context_with};
    use volint_reporter::OutputReporter;

    fn run_stage(mut stage: XsdStage, fetcher: StubFetcher) -> (Option<Outcome>, String) {
        let ctx = context_with(fetcher);
        let mut reporter = OutputReporter::new(Vec::new());
        stage.run(&mut reporter, &ctx).unwrap();
        let outcome = stage.outcome();
        (outcome, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[test]
    fn well_formed_document_is_valid_and_resolves_locally() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.org/tap/availability",
            Some("text/xml"),
            AVAILABILITY_XML,
        );
        let ctx = context_with(fetcher);
        let mut reporter = OutputReporter::new(Vec::new());
        let mut stage = stages::availability::stage();
        stage.run(&mut reporter, &ctx).unwrap();

        assert_eq!(stage.outcome(), Some(Outcome::Valid));
        assert_eq!(stage.resolver().resolved_count(), 1);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("I-VURL-0 Validating http://example.org/tap/availability"));
        assert!(!text.contains("E-"));
    }

    #[test]
    fn missing_mandatory_document_is_an_error() {
        let (outcome, text) = run_stage(stages::capabilities::stage(), StubFetcher::new());
        assert_eq!(outcome, Some(Outcome::NotFound));
        assert!(text.contains("E-GONM-0 Mandatory document"));
        assert!(text.contains("http://example.org/tap/capabilities"));
    }

    #[test]
    fn missing_optional_document_is_a_warning_with_note() {
        let (outcome, text) = run_stage(stages::availability::stage(), StubFetcher::new());
        assert_eq!(outcome, Some(Outcome::NotFound));
        assert!(text.contains("W-GONO-0 Optional document"));
        assert!(text.contains("I-AVNO-0"));
        assert!(!text.contains("E-GONM"));
    }

    #[test]
    fn malformed_markup_is_invalid_with_located_issue() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.org/tap/availability",
            Some("text/xml"),
            "<avl:availability xmlns:avl=\"http://www.ivoa.net/xml/VOSIAvailability/v1.0\">\n  <avl:available>true</avl:wrong>\n</avl:availability>",
        );
        let (outcome, text) = run_stage(stages::availability::stage(), fetcher);
        assert_eq!(outcome, Some(Outcome::Invalid));
        // Adapter output: error severity, synthesized code, location suffix.
        assert!(text.lines().any(|l| l.starts_with("E-") && l.contains("(l.2")));
    }

    #[test]
    fn wrong_root_element_is_reported() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.org/tap/availability",
            Some("text/xml"),
            "<tableset xmlns=\"http://www.ivoa.net/xml/VOSITables/v1.0\"/>",
        );
        let (outcome, text) = run_stage(stages::availability::stage(), fetcher);
        assert_eq!(outcome, Some(Outcome::Valid));
        assert!(text.contains("E-TLEL-0 Wrong top-level element name (tableset != availability)"));
    }

    #[test]
    fn unknown_namespace_degrades_to_warning() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.org/tap/availability",
            Some("text/xml"),
            "<availability xmlns=\"http://example.org/private/avail\"/>",
        );
        let (_, text) = run_stage(stages::availability::stage(), fetcher);
        assert!(text.contains("W-UNSC-0"));
        assert!(text.contains("http://example.org/private/avail"));
    }

    #[test]
    fn fetch_fault_reports_read_error_and_not_found() {
        let fetcher =
            StubFetcher::new().with_failure("http://example.org/tap/capabilities", 503);
        let (outcome, text) = run_stage(stages::capabilities::stage(), fetcher);
        assert_eq!(outcome, Some(Outcome::NotFound));
        assert!(text.contains("E-FLIO-0 Error reading"));
        assert!(text.contains("503"));
    }

    #[test]
    fn observer_fault_stops_later_observers() {
        struct Tripwire;
        impl ParseObserver for Tripwire {
            fn document_started(
                &mut self,
                _reporter: &mut dyn Reporter,
                _root: &RootElement,
            ) -> anyhow::Result<()> {
                anyhow::bail!("tripped");
            }
        }

        let mut reporter = OutputReporter::new(Vec::new());
        let resolver = SchemaResolver::bundled();
        let mut tripwire = Tripwire;
        let mut root_check = RootElementCheck::new(ExpectedRoot {
            local: "availability",
            namespace: "http://www.ivoa.net/xml/VOSIAvailability/v1.0",
        });
        let mut observers: [&mut dyn ParseObserver; 2] = [&mut tripwire, &mut root_check];
        let result = validate_document(
            &mut reporter,
            &resolver,
            AVAILABILITY_XML.as_bytes(),
            &mut observers,
        );
        assert!(result.is_err());
        // The later observer never saw the document element.
        assert!(root_check.seen().is_none());
    }

    #[test]
    fn line_col_is_one_based() {
        let body = b"abc\ndef\nghi";
        assert_eq!(line_col(body, 0), (1, 1));
        assert_eq!(line_col(body, 5), (2, 2));
        assert_eq!(line_col(body, 8), (3, 1));
    }
}
