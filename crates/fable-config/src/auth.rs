use secrecy::SecretString;
use serde::Deserialize;

/// Static bearer-token gate
///
/// When enabled, mutating requests (POST/PUT/PATCH/DELETE) must carry
/// `Authorization: Bearer <token>`. Reads stay public; token issuance is
/// the platform's concern, not this service's.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub token: SecretString,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}
