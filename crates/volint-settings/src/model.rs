use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `volint.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VolintConfigV1 {
    /// Optional schema string for tooling (`volint.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// How many repeats of one message code are printed before suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_repeat: Option<u32>,

    /// Maximum characters per output line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_char: Option<u32>,

    /// Print full cause traces to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    /// Severities to emit: `summary`, `info`, `warning`, `error`, `failure`.
    /// Absent means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,

    /// Ordered subset of stage names to run. Absent means the full default
    /// pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<String>>,

    /// Per-request HTTP timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}
