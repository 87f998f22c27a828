use serde::Deserialize;

/// Chapter document store configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Connection URL, required for the redis backend
    #[serde(default)]
    pub url: Option<String>,
    /// Key prefix separating this deployment's documents
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            namespace: default_namespace(),
        }
    }
}

/// Available store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process map, for development and tests
    #[default]
    Memory,
    /// Shared Redis instance, for deployments
    Redis,
}

fn default_namespace() -> String {
    "fable".to_string()
}
