use crate::model::VolintConfigV1;
use anyhow::Context;
use std::time::Duration;
use volint_codes::ReportType;
use volint_engine::stages::KNOWN_STAGE_NAMES;
use volint_reporter::ReporterOptions;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub max_repeat: Option<u32>,
    pub max_char: Option<u32>,
    pub debug: Option<bool>,
    pub stages: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
}

/// Fully validated settings, ready for the engine.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub reporter: ReporterOptions,
    pub stages: Vec<String>,
    pub timeout: Duration,
}

pub fn resolve_config(cfg: VolintConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let mut reporter = ReporterOptions::default();

    if let Some(max_repeat) = overrides.max_repeat.or(cfg.max_repeat) {
        if max_repeat == 0 {
            anyhow::bail!("max_repeat must be at least 1");
        }
        reporter.max_repeat = max_repeat as usize;
    }

    if let Some(max_char) = overrides.max_char.or(cfg.max_char) {
        if max_char < 24 {
            anyhow::bail!("max_char must be at least 24");
        }
        reporter.max_char = max_char as usize;
    }

    if let Some(debug) = overrides.debug.or(cfg.debug) {
        reporter.debug = debug;
    }

    if let Some(names) = cfg.allowed_types.as_deref() {
        let mut allowed = Vec::with_capacity(names.len());
        for name in names {
            allowed.push(
                parse_report_type(name)
                    .with_context(|| format!("invalid entry in allowed_types: {name}"))?,
            );
        }
        reporter.allowed_types = Some(allowed);
    }

    let stages = match overrides.stages.or(cfg.stages) {
        Some(names) if !names.is_empty() => {
            for name in &names {
                if !KNOWN_STAGE_NAMES.contains(&name.as_str()) {
                    anyhow::bail!(
                        "unknown stage: {name} (expected one of {})",
                        KNOWN_STAGE_NAMES.join(", ")
                    );
                }
            }
            names
        }
        _ => KNOWN_STAGE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    let timeout = Duration::from_secs(
        overrides
            .timeout_seconds
            .or(cfg.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    );

    Ok(ResolvedConfig {
        reporter,
        stages,
        timeout,
    })
}

fn parse_report_type(v: &str) -> anyhow::Result<ReportType> {
    match v.to_ascii_lowercase().as_str() {
        "summary" | "s" => Ok(ReportType::Summary),
        "info" | "i" => Ok(ReportType::Info),
        "warning" | "warn" | "w" => Ok(ReportType::Warning),
        "error" | "e" => Ok(ReportType::Error),
        "failure" | "f" => Ok(ReportType::Failure),
        other => anyhow::bail!("unknown report type: {other} (expected summary|info|warning|error|failure)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    #[test]
    fn defaults_apply_when_config_is_empty() {
        let resolved =
            resolve_config(VolintConfigV1::default(), Overrides::default()).unwrap();
        assert_eq!(resolved.reporter.max_repeat, 9);
        assert_eq!(resolved.reporter.max_char, 640);
        assert!(!resolved.reporter.debug);
        assert!(resolved.reporter.allowed_types.is_none());
        assert_eq!(resolved.stages, KNOWN_STAGE_NAMES);
        assert_eq!(resolved.timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = parse_config_toml("max_repeat = 5\ndebug = false\n").unwrap();
        let overrides = Overrides {
            max_repeat: Some(12),
            debug: Some(true),
            ..Overrides::default()
        };
        let resolved = resolve_config(cfg, overrides).unwrap();
        assert_eq!(resolved.reporter.max_repeat, 12);
        assert!(resolved.reporter.debug);
    }

    #[test]
    fn allowed_types_accept_names_and_letters() {
        let cfg = parse_config_toml("allowed_types = [\"warning\", \"E\"]\n").unwrap();
        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(
            resolved.reporter.allowed_types,
            Some(vec![ReportType::Warning, ReportType::Error])
        );
    }

    #[test]
    fn unknown_stage_names_are_rejected() {
        let cfg = parse_config_toml("stages = [\"capabilities\", \"telescope\"]\n").unwrap();
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("unknown stage: telescope"));
    }

    #[test]
    fn stage_subset_keeps_caller_order() {
        let cfg = parse_config_toml("stages = [\"tables\", \"capabilities\"]\n").unwrap();
        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(resolved.stages, vec!["tables", "capabilities"]);
    }

    #[test]
    fn zero_max_repeat_is_rejected() {
        let cfg = parse_config_toml("max_repeat = 0\n").unwrap();
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("max_repeat"));
    }
}
