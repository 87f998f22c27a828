//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use fable_config::{AudioConfig, AuthConfig, CloudConfig, Config, ServerConfig, StoreConfig, TtsConfig};
use secrecy::SecretString;
use url::Url;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal defaults: memory store, loopback listener, given TTS upstream
    pub fn new(tts_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                auth: None,
                store: StoreConfig::default(),
                tts: TtsConfig {
                    url: Url::parse(tts_url).expect("valid TTS URL"),
                    timeout_seconds: None,
                },
                cloud: None,
                audio: AudioConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the audio directory at a temp dir
    pub fn with_upload_dir(mut self, dir: &Path) -> Self {
        self.config.audio.upload_dir = dir.to_path_buf();
        self
    }

    /// Enable the cloud file store
    pub fn with_cloud(mut self, url: &str, api_key: &str) -> Self {
        self.config.cloud = Some(CloudConfig {
            url: Url::parse(url).expect("valid cloud URL"),
            api_key: SecretString::from(api_key),
        });
        self
    }

    /// Require a bearer token on mutating routes
    pub fn with_auth(mut self, token: &str) -> Self {
        self.config.auth = Some(AuthConfig {
            enabled: true,
            token: SecretString::from(token),
        });
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
