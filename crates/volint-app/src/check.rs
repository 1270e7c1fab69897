//! The `check` use case: run the stage pipeline against a service.

use anyhow::Context;
use time::OffsetDateTime;
use url::Url;
use volint_codes::ReportType;
use volint_engine::fetch::HttpFetcher;
use volint_engine::{ServiceContext, Stage, run_stages, stages};
use volint_reporter::OutputReporter;
use volint_settings::{Overrides, ResolvedConfig};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Base URL of the service under test.
    pub service_url: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Per-severity report counts for the whole run, suppressed included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub summary: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub failure: usize,
}

/// Output from the check use case.
#[derive(Debug)]
pub struct CheckOutput {
    /// Full rendered report text.
    pub rendered: String,
    pub totals: Totals,
    pub started_at: OffsetDateTime,
    pub duration_ms: u64,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, build the pipeline, lint the
/// service over HTTP, collect the report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let resolved = resolve(input.config_text, input.overrides.clone())?;
    let base_url = Url::parse(input.service_url)
        .with_context(|| format!("bad service URL {}", input.service_url))?;
    let fetcher = HttpFetcher::new(resolved.timeout).context("build HTTP client")?;
    let ctx = ServiceContext::new(base_url, Box::new(fetcher));
    run_check_against(resolved, &ctx)
}

/// The same use case over a prepared service context. Split out so callers
/// can substitute a canned fetcher.
pub fn run_check_against(
    resolved: ResolvedConfig,
    ctx: &ServiceContext,
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let mut pipeline: Vec<Box<dyn Stage>> = Vec::with_capacity(resolved.stages.len());
    for name in &resolved.stages {
        // Names were validated during config resolution.
        let stage = stages::create(name).with_context(|| format!("unknown stage {name}"))?;
        pipeline.push(stage);
    }

    let mut reporter = OutputReporter::with_options(Vec::new(), resolved.reporter.clone());
    reporter.start(&[
        format!("This is volint {}", env!("CARGO_PKG_VERSION")),
        format!("Checking {}", ctx.base_url()),
        format!("Stages: {}", resolved.stages.join(", ")),
    ]);
    run_stages(&mut reporter, ctx, &mut pipeline);
    reporter.end();

    let totals = Totals {
        summary: reporter.total(ReportType::Summary),
        info: reporter.total(ReportType::Info),
        warning: reporter.total(ReportType::Warning),
        error: reporter.total(ReportType::Error),
        failure: reporter.total(ReportType::Failure),
    };
    let rendered = String::from_utf8(reporter.into_inner()).context("report is not UTF-8")?;

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    Ok(CheckOutput {
        rendered,
        totals,
        started_at,
        duration_ms,
        resolved_config: resolved,
    })
}

fn resolve(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    // Empty config is allowed, defaults apply.
    let cfg = if config_text.trim().is_empty() {
        volint_settings::VolintConfigV1::default()
    } else {
        volint_settings::parse_config_toml(config_text).context("parse config")?
    };
    volint_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Map run totals to an exit code: 0 = clean or warnings only, 2 = errors
/// or stage failures.
pub fn verdict_exit_code(totals: &Totals) -> i32 {
    if totals.error > 0 || totals.failure > 0 { 2 } else { 0 }
}
