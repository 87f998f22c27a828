use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Cloud file storage configuration (UploadThing-compatible API)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConfig {
    #[serde(default = "default_url")]
    pub url: Url,
    pub api_key: SecretString,
}

fn default_url() -> Url {
    Url::parse("https://api.uploadthing.com").expect("default cloud URL must parse")
}
