use serde::Deserialize;

/// Log filtering and formatting configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Tracing filter directives, e.g. `"info,fable_audio=debug"`
    ///
    /// Falls back to `RUST_LOG`, then `"info"`.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Full,
    /// Newline-delimited JSON for log shippers
    Json,
}
