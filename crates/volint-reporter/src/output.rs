use crate::Reporter;
use std::collections::BTreeMap;
use std::io::Write;
use volint_codes::{Label, Report, ReportType};

/// Tuning knobs for an [`OutputReporter`].
#[derive(Clone, Debug)]
pub struct ReporterOptions {
    /// How many occurrences of one compound code are printed verbatim.
    /// Later occurrences are counted but not printed.
    pub max_repeat: usize,
    /// Maximum characters per output line; longer lines are truncated with
    /// a trailing ellipsis.
    pub max_char: usize,
    /// Print full cause traces to stderr.
    pub debug: bool,
    /// Severities to emit; `None` means all. Reports of excluded severities
    /// are discarded without counting.
    pub allowed_types: Option<Vec<ReportType>>,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        ReporterOptions {
            max_repeat: 9,
            max_char: 640,
            debug: false,
            allowed_types: None,
        }
    }
}

/// Unit of counting and suppression: severity, active section, label.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CompoundKey {
    rtype: ReportType,
    section: Option<String>,
    label: Label,
}

impl CompoundKey {
    /// Compound code string, e.g. `E-TMC-XXXX` or `E-XXXX` with no section.
    fn code_string(&self) -> String {
        match &self.section {
            Some(sec) => format!("{}-{}-{}", self.rtype.display_char(), sec, self.label),
            None => format!("{}-{}", self.rtype.display_char(), self.label),
        }
    }
}

/// Line-oriented reporter writing to a configurable sink.
///
/// Counts every accepted report per compound code and per severity;
/// occurrences beyond `max_repeat` are suppressed from output but still
/// counted, and can later be surfaced through
/// [`summarise_unreported`](OutputReporter::summarise_unreported).
///
/// Section state is single-level by design: starting a section while one is
/// active replaces it, there is no nesting stack.
pub struct OutputReporter<W: Write> {
    sink: W,
    options: ReporterOptions,
    section: Option<String>,
    counts: BTreeMap<CompoundKey, usize>,
    type_totals: BTreeMap<ReportType, usize>,
}

impl<W: Write> OutputReporter<W> {
    pub fn new(sink: W) -> OutputReporter<W> {
        OutputReporter::with_options(sink, ReporterOptions::default())
    }

    pub fn with_options(sink: W, options: ReporterOptions) -> OutputReporter<W> {
        OutputReporter {
            sink,
            options,
            section: None,
            counts: BTreeMap::new(),
            type_totals: BTreeMap::new(),
        }
    }

    /// Opens the run: one output line per announcement.
    pub fn start(&mut self, announcements: &[String]) {
        for line in announcements {
            self.emit_line(line);
        }
    }

    /// Closes the run with a totals line covering every counted report,
    /// suppressed or not.
    pub fn end(&mut self) {
        // Every severity appears, in fixed order, even when filtered out.
        let totals = ReportType::ALL
            .iter()
            .map(|t| format!("{}: {}", t.name(), self.type_totals.get(t).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("; ");
        self.emit_line("");
        self.emit_line(&format!("Totals: {totals}"));
        self.emit_line("");
    }

    /// Opens a section, replacing any active one.
    pub fn start_section(&mut self, code: &str, description: &str) {
        self.emit_line("");
        self.emit_line(&format!("Section {code}: {description}"));
        self.section = Some(code.to_string());
    }

    pub fn end_section(&mut self) {
        self.section = None;
    }

    /// Emits one summary line per compound code whose count exceeded the
    /// repeat threshold, then forgets that count, so a repeat call reports
    /// nothing further.
    ///
    /// `section_filter` restricts the summary to keys recorded under that
    /// section; `None` summarises every key.
    pub fn summarise_unreported(&mut self, section_filter: Option<&str>) {
        let max_repeat = self.options.max_repeat;
        let spent: Vec<(CompoundKey, usize)> = self
            .counts
            .iter()
            .filter(|(key, _)| match section_filter {
                Some(sec) => key.section.as_deref() == Some(sec),
                None => true,
            })
            .filter(|&(_, &count)| count > max_repeat)
            .map(|(key, &count)| (key.clone(), count))
            .collect();
        for (key, count) in spent {
            let filler = "x".repeat(self.count_width());
            let line = format!(
                "{}-{} ({} more)",
                key.code_string(),
                filler,
                count - max_repeat
            );
            self.emit_line(&line);
            self.counts.remove(&key);
        }
    }

    /// Forgets all counts, per-code and per-severity.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.type_totals.clear();
    }

    /// Total number of counted reports of one severity, suppressed included.
    pub fn total(&self, rtype: ReportType) -> usize {
        self.type_totals.get(&rtype).copied().unwrap_or(0)
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn count_width(&self) -> usize {
        self.options.max_repeat.to_string().len()
    }

    fn accepts(&self, rtype: ReportType) -> bool {
        match &self.options.allowed_types {
            Some(allowed) => allowed.contains(&rtype),
            None => true,
        }
    }

    fn emit_line(&mut self, line: &str) {
        let line = truncate(line, self.options.max_char);
        // Sink write failures have nowhere to go; drop them.
        let _ = writeln!(self.sink, "{line}");
    }

    fn deliver(&mut self, report: Report) {
        let code = report.code();
        let rtype = code.report_type();
        if !self.accepts(rtype) {
            return;
        }

        let message = report.message().trim();
        let message = if message.is_empty() { "?" } else { message };

        let key = CompoundKey {
            rtype,
            section: self.section.clone(),
            label: code.label(),
        };
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        let count = *count;
        *self.type_totals.entry(rtype).or_insert(0) += 1;

        if count <= self.options.max_repeat {
            let code_str = key.code_string();
            let index = format!("{:0width$}", count - 1, width = self.count_width());
            let mut lines = message.lines();
            if let Some(first) = lines.next() {
                let mut head = format!("{code_str}-{index} {first}");
                if let Some(cause) = report.cause() {
                    head.push_str(&format!(" [{}]", cause_text(cause)));
                }
                self.emit_line(&head);
            }
            for rest in lines {
                self.emit_line(&format!("{code_str}+{index} {rest}"));
            }
        }

        if self.options.debug {
            if let Some(cause) = report.cause() {
                // Full trace to the side channel, suppressed or not.
                eprintln!("{cause:?}");
            }
        }
    }
}

impl<W: Write> Reporter for OutputReporter<W> {
    fn submit(&mut self, report: Report) {
        self.deliver(report);
    }

    fn current_section(&self) -> Option<&str> {
        self.section.as_deref()
    }
}

fn cause_text(cause: &anyhow::Error) -> String {
    let text = cause.to_string();
    if text.trim().is_empty() {
        format!("{cause:?}")
    } else {
        text
    }
}

/// Truncates to at most `max_char` characters, ending in `...` when
/// anything was cut. Widths too small to hold the ellipsis keep a bare
/// prefix instead.
fn truncate(line: &str, max_char: usize) -> String {
    if line.chars().count() <= max_char {
        return line.to_string();
    }
    if max_char <= 3 {
        return line.chars().take(max_char).collect();
    }
    let mut out: String = line.chars().take(max_char - 3).collect();
    out.push_str("...");
    out
}
