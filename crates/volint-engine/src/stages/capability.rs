//! Content checks on the capabilities document.
//!
//! Schema validation only proves the document is well-shaped; this stage
//! checks that what it declares makes sense for a TAP service: the TAP
//! capability itself, an ADQL language entry with a version, at least one
//! output format, consistent upload limits, and well-formed user-defined
//! function signatures.

use crate::context::ServiceContext;
use crate::fetch::Fetch;
use crate::pipeline::Stage;
use quick_xml::Reader;
use quick_xml::events::Event;
use volint_codes::FixedCode;
use volint_reporter::{Reporter, ReporterExt};

const TAP_STANDARD_ID: &str = "ivo://ivoa.net/std/TAP";
const UDF_FEATURES_TYPE: &str = "features-udf";

#[derive(Debug, Default)]
struct Capability {
    standard_id: Option<String>,
    languages: Vec<Language>,
    output_format_count: usize,
    upload_hard: Option<u64>,
    upload_default: Option<u64>,
    base_access_url: Option<String>,
    udf_forms: Vec<String>,
}

#[derive(Debug, Default)]
struct Language {
    name: Option<String>,
    versions: Vec<String>,
}

/// Streaming extraction of the capability declarations relevant to the
/// checks below. Unknown elements are skipped, not rejected.
fn parse_capabilities(body: &[u8]) -> Result<Vec<Capability>, quick_xml::Error> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut capabilities: Vec<Capability> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut in_udf_features = false;
    let mut access_url_use: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                let local = local_name(element.name().as_ref());
                match local.as_str() {
                    "capability" => {
                        let mut capability = Capability::default();
                        capability.standard_id = attr(&element, b"standardID");
                        capabilities.push(capability);
                    }
                    "language" => {
                        if let Some(capability) = capabilities.last_mut() {
                            capability.languages.push(Language::default());
                        }
                    }
                    "languageFeatures" => {
                        in_udf_features = attr(&element, b"type")
                            .is_some_and(|t| t.contains(UDF_FEATURES_TYPE));
                    }
                    "outputFormat" => {
                        if let Some(capability) = capabilities.last_mut() {
                            capability.output_format_count += 1;
                        }
                    }
                    "accessURL" => {
                        access_url_use = attr(&element, b"use");
                    }
                    _ => {}
                }
                path.push(local);
            }
            Event::Empty(element) => {
                let local = local_name(element.name().as_ref());
                if local == "outputFormat" {
                    if let Some(capability) = capabilities.last_mut() {
                        capability.output_format_count += 1;
                    }
                }
            }
            Event::End(element) => {
                let local = local_name(element.name().as_ref());
                if local == "languageFeatures" {
                    in_udf_features = false;
                }
                if local == "accessURL" {
                    access_url_use = None;
                }
                path.pop();
            }
            Event::Text(text) => {
                let value = text.unescape()?.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                let parent = path.last().map(String::as_str).unwrap_or("");
                let grandparent = path
                    .len()
                    .checked_sub(2)
                    .map(|i| path[i].as_str())
                    .unwrap_or("");
                let Some(capability) = capabilities.last_mut() else {
                    continue;
                };
                match (grandparent, parent) {
                    ("language", "name") => {
                        if let Some(language) = capability.languages.last_mut() {
                            language.name = Some(value);
                        }
                    }
                    ("language", "version") => {
                        if let Some(language) = capability.languages.last_mut() {
                            language.versions.push(value);
                        }
                    }
                    ("uploadLimit", "hard") => {
                        capability.upload_hard = value.parse().ok();
                    }
                    ("uploadLimit", "default") => {
                        capability.upload_default = value.parse().ok();
                    }
                    (_, "accessURL") => {
                        if access_url_use.as_deref() == Some("base") {
                            capability.base_access_url = Some(value);
                        }
                    }
                    (_, "form") => {
                        if in_udf_features {
                            capability.udf_forms.push(value);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(capabilities)
}

fn local_name(name: &[u8]) -> String {
    let local = name
        .iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name);
    String::from_utf8_lossy(local).into_owned()
}

fn attr(element: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// `name(arguments) -> type`, per the TAPRegExt UDF convention.
fn valid_udf_form(form: &str) -> bool {
    let form = form.trim();
    let Some(open) = form.find('(') else {
        return false;
    };
    let name = &form[..open];
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return false;
    }
    let Some(close) = form.rfind(')') else {
        return false;
    };
    if close < open {
        return false;
    }
    let tail = form[close + 1..].trim_start();
    match tail.strip_prefix("->") {
        Some(return_type) => !return_type.trim().is_empty(),
        None => false,
    }
}

pub struct CapabilityContentStage;

impl CapabilityContentStage {
    pub fn new() -> CapabilityContentStage {
        CapabilityContentStage
    }
}

impl Default for CapabilityContentStage {
    fn default() -> Self {
        CapabilityContentStage::new()
    }
}

impl Stage for CapabilityContentStage {
    fn code(&self) -> &'static str {
        "CAP"
    }

    fn description(&self) -> &'static str {
        "Check content of the capabilities document"
    }

    fn run(&mut self, reporter: &mut dyn Reporter, ctx: &ServiceContext) -> anyhow::Result<()> {
        let url = ctx.endpoint("capabilities")?;
        reporter.report(
            FixedCode::CapabilitiesUrl,
            &format!("Reading capability metadata from {url}"),
        );

        let document = match ctx.fetcher().fetch(&url) {
            Ok(Fetch::Document(document)) => document,
            Ok(Fetch::Missing) => {
                reporter.report(
                    FixedCode::CapabilitiesReadError,
                    &format!("Capabilities document {url} is absent"),
                );
                return Ok(());
            }
            Err(fault) => {
                reporter.report_with_cause(
                    FixedCode::CapabilitiesReadError,
                    &format!("Error reading capabilities from {url}"),
                    fault.into(),
                );
                return Ok(());
            }
        };

        let capabilities = match parse_capabilities(&document.body) {
            Ok(capabilities) => capabilities,
            Err(fault) => {
                reporter.report_with_cause(
                    FixedCode::CapabilitiesParseError,
                    &format!("Error parsing capabilities document {url}"),
                    fault.into(),
                );
                return Ok(());
            }
        };

        let Some(tap) = capabilities
            .iter()
            .find(|c| c.standard_id.as_deref() == Some(TAP_STANDARD_ID))
        else {
            reporter.report(
                FixedCode::MissingTapCapability,
                &format!("No capability with standardID {TAP_STANDARD_ID} declared"),
            );
            return Ok(());
        };

        match tap
            .languages
            .iter()
            .find(|l| l.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case("ADQL")))
        {
            Some(adql) if adql.versions.is_empty() => {
                reporter.report(
                    FixedCode::AdqlVersionUndeclared,
                    "Language ADQL declares no version",
                );
            }
            Some(_) => {}
            None => {
                reporter.report(
                    FixedCode::NoAdqlLanguage,
                    "ADQL not declared among supported query languages",
                );
            }
        }

        if tap.output_format_count == 0 {
            reporter.report(FixedCode::NoOutputFormats, "No output formats declared");
        }

        if let (Some(hard), Some(default)) = (tap.upload_hard, tap.upload_default) {
            if default > hard {
                reporter.report(
                    FixedCode::UploadLimitInconsistent,
                    &format!("Default upload limit {default} exceeds hard limit {hard}"),
                );
            }
        }

        for form in &tap.udf_forms {
            if !valid_udf_form(form) {
                reporter.report(
                    FixedCode::BadUdfSignature,
                    &format!("UDF signature \"{form}\" is not of the form name(args) -> type"),
                );
            }
        }

        if let Some(declared) = tap.base_access_url.as_deref() {
            let declared_trimmed = declared.trim_end_matches('/');
            let in_use = ctx.base_url().as_str().trim_end_matches('/');
            if declared_trimmed != in_use {
                reporter.report(
                    FixedCode::CapabilitiesUrlForm,
                    &format!("Declared TAP base URL {declared} differs from {in_use} in use"),
                );
            }
        }

        Ok(())
    }
}
