//! The `explain` use case: look up message code documentation.

use volint_codes::FixedCode;

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found a catalogue entry for the identifier.
    Found(FixedCode),
    /// Unknown identifier.
    NotFound { identifier: String },
}

/// Look up a catalogue code, by bare label or compound form.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match FixedCode::lookup(identifier) {
        Some(code) => ExplainOutput::Found(code),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
        },
    }
}

/// Format a catalogue entry for terminal display.
pub fn format_explanation(code: FixedCode) -> String {
    let title = format!("{}-{}", code.report_type().display_char(), code.label());
    let mut out = String::new();

    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.len()));
    out.push_str("\n\n");
    out.push_str(&format!("Severity: {}\n\n", code.report_type().name()));
    out.push_str(code.description());
    out.push('\n');
    if let Some(citation) = code.citation() {
        out.push_str(&format!(
            "\nReference: {} section {}\n",
            citation.document, citation.section
        ));
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown message code: {identifier}\n\n"));
    out.push_str("Available codes:\n");
    for code in FixedCode::ALL {
        out.push_str(&format!(
            "  - {}-{}  {}\n",
            code.report_type().display_char(),
            code.label(),
            code.description()
        ));
    }

    out
}
