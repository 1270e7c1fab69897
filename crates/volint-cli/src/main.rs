//! CLI entry point for volint.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `volint-app` crate.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use volint_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, run_check, run_explain,
    verdict_exit_code,
};
use volint_settings::{Overrides, VolintConfigV1};

#[derive(Parser, Debug)]
#[command(
    name = "volint",
    version,
    about = "Conformance linter for TAP/VOSI web services"
)]
struct Cli {
    /// Path to volint config TOML.
    #[arg(long, default_value = "volint.toml")]
    config: PathBuf,

    /// Override printed repeats per message code.
    #[arg(long)]
    max_repeat: Option<u32>,

    /// Override maximum characters per output line.
    #[arg(long)]
    max_char: Option<u32>,

    /// Print full cause traces to stderr.
    #[arg(long)]
    debug: bool,

    /// Ordered subset of stages to run.
    #[arg(long, value_delimiter = ',')]
    stages: Option<Vec<String>>,

    /// HTTP timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the conformance stages against a service.
    Check {
        /// Base URL of the service, e.g. http://example.org/tap
        service_url: String,
    },

    /// Explain a message code (e.g. "E-GONM" or "GONM").
    Explain { code: String },

    /// Print the JSON schema for volint.toml.
    Schema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.cmd {
        Commands::Check { service_url } => cmd_check(&cli, service_url),
        Commands::Explain { code } => cmd_explain(code),
        Commands::Schema => cmd_schema(),
    }
}

fn cmd_check(cli: &Cli, service_url: &str) -> anyhow::Result<()> {
    // Missing config file is allowed, defaults apply.
    let config_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

    let overrides = Overrides {
        max_repeat: cli.max_repeat,
        max_char: cli.max_char,
        debug: cli.debug.then_some(true),
        stages: cli.stages.clone(),
        timeout_seconds: cli.timeout,
    };

    let result = run_check(CheckInput {
        service_url,
        config_text: &config_text,
        overrides,
    });

    match result {
        Ok(output) => {
            print!("{}", output.rendered);
            let code = verdict_exit_code(&output.totals);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("volint error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_explain(code: &str) -> anyhow::Result<()> {
    match run_explain(code) {
        ExplainOutput::Found(entry) => {
            print!("{}", format_explanation(entry));
            Ok(())
        }
        ExplainOutput::NotFound { identifier } => {
            eprint!("{}", format_not_found(&identifier));
            std::process::exit(1);
        }
    }
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(VolintConfigV1);
    let text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    println!("{text}");
    Ok(())
}
