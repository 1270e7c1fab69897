//! Declared-vs-permitted Content-Type compliance.

use url::Url;
use volint_codes::FixedCode;
use volint_reporter::{Reporter, ReporterExt};

/// A parsed MIME type: type, subtype, and any parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentType {
    ttype: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl ContentType {
    /// A bare permitted template with no parameters.
    pub fn new(ttype: &str, subtype: &str) -> ContentType {
        ContentType {
            ttype: ttype.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// Parses a Content-Type header value. Returns `None` if the value is
    /// not structurally `type/subtype[;param=value...]`.
    pub fn parse(text: &str) -> Option<ContentType> {
        let mut parts = text.split(';');
        let head = parts.next()?.trim();
        let (ttype, subtype) = head.split_once('/')?;
        if !is_token(ttype) || !is_token(subtype) {
            return None;
        }
        let mut parameters = Vec::new();
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, value) = param.split_once('=')?;
            parameters.push((
                name.trim().to_ascii_lowercase(),
                value.trim().trim_matches('"').to_string(),
            ));
        }
        Some(ContentType {
            ttype: ttype.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            parameters,
        })
    }

    /// Structural match on type and subtype; parameters and case ignored.
    pub fn matches(&self, ttype: &str, subtype: &str) -> bool {
        self.ttype.eq_ignore_ascii_case(ttype) && self.subtype.eq_ignore_ascii_case(subtype)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ttype, self.subtype)
    }
}

// RFC 2045 token, minus a few rarely-seen characters.
fn is_token(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_' | '*' | '!' | '#')
        })
}

/// An ordered list of permitted (type, subtype) templates.
#[derive(Clone, Debug)]
pub struct ContentTypeOptions {
    permitted: Vec<ContentType>,
}

impl ContentTypeOptions {
    pub fn new(permitted: Vec<ContentType>) -> ContentTypeOptions {
        ContentTypeOptions { permitted }
    }

    /// Checks a declared header value against the permitted templates.
    ///
    /// Absent or empty value is a WARNING; a value that does not parse is an
    /// ERROR distinct from a parseable mismatch, which is an ERROR naming
    /// the expected templates, the offending value, and the source URL.
    /// A match produces no report.
    pub fn check_type(&self, reporter: &mut dyn Reporter, declared: Option<&str>, url: &Url) {
        let declared = declared.map(str::trim).unwrap_or("");
        if declared.is_empty() {
            reporter.report(
                FixedCode::NoContentType,
                &format!("No Content-Type header for {url}"),
            );
            return;
        }
        let Some(ctype) = ContentType::parse(declared) else {
            reporter.report(
                FixedCode::InvalidContentType,
                &format!("Invalid Content-Type header \"{declared}\" for {url}"),
            );
            return;
        };
        if !self
            .permitted
            .iter()
            .any(|p| ctype.matches(&p.ttype, &p.subtype))
        {
            let expected = self
                .permitted
                .iter()
                .map(ContentType::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            reporter.report(
                FixedCode::BadContentType,
                &format!(
                    "Incorrect Content-Type \"{declared}\" for {url}; expected one of: {expected}"
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volint_reporter::OutputReporter;

    fn votable_options() -> ContentTypeOptions {
        ContentTypeOptions::new(vec![ContentType::new("application", "x-votable+xml")])
    }

    fn check(options: &ContentTypeOptions, declared: Option<&str>) -> String {
        let mut reporter = OutputReporter::new(Vec::new());
        let url = Url::parse("http://example.org/tap/sync").unwrap();
        options.check_type(&mut reporter, declared, &url);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn matching_type_with_parameters_is_silent() {
        let out = check(
            &votable_options(),
            Some("application/x-votable+xml;serialization=BINARY"),
        );
        assert!(out.is_empty(), "unexpected report: {out}");
    }

    #[test]
    fn empty_value_warns_about_missing_header() {
        let out = check(&votable_options(), Some(""));
        assert!(out.starts_with("W-NOCT-0 No Content-Type"));
        let out = check(&votable_options(), None);
        assert!(out.starts_with("W-NOCT-0 No Content-Type"));
    }

    #[test]
    fn unparsable_value_is_a_distinct_error() {
        let out = check(&votable_options(), Some("not a mime type"));
        assert!(out.starts_with("E-DRCT-0 Invalid Content-Type"));
    }

    #[test]
    fn mismatch_names_offender_and_expectation() {
        let out = check(&votable_options(), Some("text/html"));
        assert!(out.starts_with("E-BMIM-0"));
        assert!(out.contains("text/html"));
        assert!(out.contains("application/x-votable+xml"));
        assert!(out.contains("http://example.org/tap/sync"));
    }

    #[test]
    fn case_differences_do_not_matter() {
        let out = check(&votable_options(), Some("Application/X-VOTable+XML"));
        assert!(out.is_empty());
    }

    #[test]
    fn parameters_are_parsed_but_ignored_for_matching() {
        let ctype = ContentType::parse("text/xml; charset=UTF-8").unwrap();
        assert!(ctype.matches("text", "xml"));
        assert_eq!(ctype.parameter("charset"), Some("UTF-8"));
    }
}
