//! Config parsing and override resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::VolintConfigV1;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `volint.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<VolintConfigV1> {
    let cfg: VolintConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings used by the engine (file values + CLI overrides).
pub fn resolve_config(cfg: VolintConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
