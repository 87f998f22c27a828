#![allow(clippy::must_use_candidate)]

pub mod audio;
pub mod auth;
pub mod cloud;
pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod store;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use audio::*;
pub use auth::*;
pub use cloud::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use store::*;
pub use telemetry::*;
pub use tts::*;

/// Top-level Fable configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Static bearer-token gate for mutating routes
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Chapter document store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// TTS microservice endpoint
    pub tts: TtsConfig,
    /// Cloud file storage (audio is kept on local disk when absent)
    #[serde(default)]
    pub cloud: Option<CloudConfig>,
    /// Local audio directory and upload constraints
    #[serde(default)]
    pub audio: AudioConfig,
    /// Log filtering and formatting
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
