use std::path::{Path, PathBuf};

use fable_config::AudioConfig;
use fable_store::ChapterId;

/// The local audio directory and its public URL mapping
///
/// Holds operator uploads and transient TTS renders pending cloud migration.
/// The TTS service writes into the same directory, with the chapter id
/// embedded in the filename so interrupted renders can be matched later.
#[derive(Clone)]
pub struct AudioDir {
    dir: PathBuf,
    public_base: String,
}

impl AudioDir {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            dir: config.upload_dir.clone(),
            public_base: config.public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Create the directory if it does not exist yet
    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn local_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// URL under which the platform serves a file from this directory
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.public_base)
    }

    /// Whether an `audio_url` points into this directory
    pub fn is_local_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.public_base)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Map a local `audio_url` back to its path on disk
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        // Reject anything that could climb out of the directory
        if rest.is_empty() || rest.contains("..") || rest.contains('/') {
            return None;
        }
        Some(self.dir.join(rest))
    }

    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.ensure().await?;
        tokio::fs::write(self.local_path(file_name), bytes).await
    }

    /// Delete a file, treating an already-missing file as success
    pub async fn remove(&self, path: &Path) -> std::io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Find an orphaned render for a chapter
    ///
    /// TTS render filenames end in `_{chapter_id}.mp3` or `_{chapter_id}.wav`.
    pub async fn find_render(&self, chapter_id: ChapterId) -> std::io::Result<Option<PathBuf>> {
        let suffixes = [format!("_{chapter_id}.mp3"), format!("_{chapter_id}.wav")];

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if suffixes.iter().any(|s| name.ends_with(s)) {
                return Ok(Some(entry.path()));
            }
        }

        Ok(None)
    }
}

/// Lowercased extension of an uploaded filename, with the leading dot
pub fn extension_of(file_name: &str) -> Option<String> {
    let dot = file_name.rfind('.')?;
    if dot == 0 || dot == file_name.len() - 1 {
        return None;
    }
    Some(file_name[dot..].to_ascii_lowercase())
}
