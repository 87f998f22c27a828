use std::path::Path;

use secrecy::ExposeSecret;

use crate::{AnyOrArray, Config, StoreBackend};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `${VAR}` placeholders, then deserializes and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a section is incomplete or carries values the
    /// server cannot honor
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_auth()?;
        self.validate_store()?;
        self.validate_audio()?;
        self.validate_cors()?;
        Ok(())
    }

    fn validate_auth(&self) -> anyhow::Result<()> {
        let Some(ref auth) = self.auth else {
            return Ok(());
        };

        if auth.enabled && auth.token.expose_secret().is_empty() {
            anyhow::bail!("auth.token must not be empty when auth is enabled");
        }

        Ok(())
    }

    fn validate_store(&self) -> anyhow::Result<()> {
        if self.store.backend == StoreBackend::Redis && self.store.url.is_none() {
            anyhow::bail!("store.url is required for the redis backend");
        }

        if self.store.namespace.is_empty() {
            anyhow::bail!("store.namespace must not be empty");
        }

        Ok(())
    }

    fn validate_audio(&self) -> anyhow::Result<()> {
        if self.audio.max_upload_bytes == 0 {
            anyhow::bail!("audio.max_upload_bytes must be greater than 0");
        }

        if self.audio.allowed_extensions.is_empty() {
            anyhow::bail!("audio.allowed_extensions must not be empty");
        }

        for extension in &self.audio.allowed_extensions {
            if !extension.starts_with('.') || extension.len() < 2 {
                anyhow::bail!("audio extension '{extension}' must start with a dot");
            }
        }

        Ok(())
    }

    /// Credentialed CORS cannot be combined with a wildcard origin
    fn validate_cors(&self) -> anyhow::Result<()> {
        if let Some(ref cors) = self.server.cors
            && cors.credentials
            && matches!(cors.origins, AnyOrArray::Any)
        {
            anyhow::bail!("cors.credentials requires an explicit origin list");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r#"
[tts]
url = "http://localhost:8000"
"#;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        config.validate().unwrap();

        assert!(config.server.health.enabled);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.audio.public_base, "/uploads/audio");
        assert!(config.cloud.is_none());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = toml::from_str::<Config>("[tts]\nurl = \"http://localhost:8000\"\nunknown = 1\n").unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn enabled_auth_requires_token() {
        let raw = r#"
[tts]
url = "http://localhost:8000"

[auth]
token = ""
"#;
        let config: Config = toml::from_str(raw).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth.token"));
    }

    #[test]
    fn redis_backend_requires_url() {
        let raw = r#"
[tts]
url = "http://localhost:8000"

[store]
backend = "redis"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.url"));
    }

    #[test]
    fn bare_extension_is_rejected() {
        let raw = r#"
[tts]
url = "http://localhost:8000"

[audio]
allowed_extensions = ["mp3"]
"#;
        let config: Config = toml::from_str(raw).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("start with a dot"));
    }

    #[test]
    fn credentialed_cors_rejects_wildcard_origin() {
        let raw = r#"
[tts]
url = "http://localhost:8000"

[server.cors]
origins = "*"
credentials = true
"#;
        let config: Config = toml::from_str(raw).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("explicit origin list"));
    }

    #[test]
    fn load_expands_placeholders_from_file() {
        temp_env::with_var("FABLE_TEST_TTS_URL", Some("http://tts.internal:8000"), || {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "[tts]\nurl = \"${{FABLE_TEST_TTS_URL}}\"\n").unwrap();

            let config = Config::load(file.path()).unwrap();
            assert_eq!(config.tts.url.as_str(), "http://tts.internal:8000/");
        });
    }
}
