use serde::Deserialize;
use url::Url;

/// TTS microservice endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Base URL of the TTS service
    pub url: Url,
    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}
