use std::path::PathBuf;

use serde::Deserialize;

/// Local audio directory and upload constraints
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioConfig {
    /// Directory holding uploaded and rendered audio files
    ///
    /// Shared with the TTS service, which writes rendered files here.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// URL prefix under which the platform serves files from `upload_dir`
    #[serde(default = "default_public_base")]
    pub public_base: String,
    /// Upload size cap in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accepted upload extensions, lowercase with leading dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_base: default_public_base(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads/audio")
}

fn default_public_base() -> String {
    "/uploads/audio".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    // 100 MiB
    100 << 20
}

fn default_allowed_extensions() -> Vec<String> {
    [".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
