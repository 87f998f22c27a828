use std::sync::Arc;
use std::time::Duration;

use fable_cloud::CloudClient;
use fable_config::{AudioConfig, Config};
use fable_store::{
    AudioSource, AudioStatus, Chapter, ChapterAudio, ChapterId, ChapterStore, Novel, NovelId, create_store,
};
use fable_tts::{SynthesizeRequest, TtsClient};

use crate::error::{AudioError, Result};
use crate::files::{AudioDir, extension_of};
use crate::request::AudioUpload;
use crate::types::{AudioResult, ChapterAudioInfo, NovelAudioList, TtsHealth};

/// Orchestrates chapter narration across the local upload directory, the
/// external TTS service, and the cloud file store
///
/// Single process, request-per-call: the external HTTP calls are the only
/// suspension points and every store write commits immediately. The
/// "reject if processing" guard is a read-then-write check, so two
/// concurrent generation requests can both pass it; that lost-update window
/// is accepted.
pub struct AudioService {
    store: Arc<dyn ChapterStore>,
    tts: TtsClient,
    cloud: Option<CloudClient>,
    dir: AudioDir,
    config: AudioConfig,
}

impl AudioService {
    pub fn new(store: Arc<dyn ChapterStore>, tts: TtsClient, cloud: Option<CloudClient>, config: AudioConfig) -> Self {
        Self {
            store,
            tts,
            cloud,
            dir: AudioDir::new(&config),
            config,
        }
    }

    /// Build the service and its clients from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the store connection or an HTTP client fails to
    /// initialize
    pub async fn from_config(config: &Config) -> anyhow::Result<Arc<Self>> {
        let store = create_store(&config.store).await?;
        Self::with_store(config, store)
    }

    /// Build the service around an existing store handle
    ///
    /// Lets tests seed chapters before the service starts answering.
    pub fn with_store(config: &Config, store: Arc<dyn ChapterStore>) -> anyhow::Result<Arc<Self>> {
        let timeout = config.tts.timeout_seconds.map(Duration::from_secs);
        let tts = TtsClient::new(config.tts.url.clone(), timeout)?;

        let cloud = config
            .cloud
            .as_ref()
            .map(|c| CloudClient::new(c.url.clone(), c.api_key.clone()))
            .transpose()?;

        if cloud.is_none() {
            tracing::warn!("no cloud storage configured, narration audio stays on local disk");
        }

        Ok(Arc::new(Self::new(store, tts, cloud, config.audio.clone())))
    }

    pub fn store(&self) -> &Arc<dyn ChapterStore> {
        &self.store
    }

    pub(crate) fn dir(&self) -> &AudioDir {
        &self.dir
    }

    pub(crate) fn tts(&self) -> &TtsClient {
        &self.tts
    }

    pub(crate) fn cloud(&self) -> Option<&CloudClient> {
        self.cloud.as_ref()
    }

    pub(crate) async fn require_chapter(&self, id: ChapterId) -> Result<Chapter> {
        self.store.chapter(id).await?.ok_or(AudioError::NotFound("chapter"))
    }

    pub(crate) async fn require_novel(&self, id: NovelId) -> Result<Novel> {
        self.store.novel(id).await?.ok_or(AudioError::NotFound("novel"))
    }

    /// Store an operator-provided audio file for a chapter
    ///
    /// Replaces any previous local file; cloud files are never deleted.
    pub async fn upload_audio(&self, chapter_id: ChapterId, upload: AudioUpload) -> Result<AudioResult> {
        let chapter = self.require_chapter(chapter_id).await?;

        let extension = extension_of(&upload.file_name)
            .ok_or_else(|| AudioError::InvalidRequest("audio file has no extension".to_string()))?;
        if !self.config.allowed_extensions.contains(&extension) {
            return Err(AudioError::InvalidRequest(format!(
                "audio format '{extension}' is not supported"
            )));
        }
        if upload.bytes.len() > self.config.max_upload_bytes {
            return Err(AudioError::InvalidRequest("audio file exceeds the upload size limit".to_string()));
        }

        if let Some(url) = &chapter.audio.audio_url
            && let Some(old_path) = self.dir.path_for_url(url)
        {
            self.dir.remove(&old_path).await?;
        }

        let file_name = format!("audio-{chapter_id}-{}{extension}", uuid::Uuid::new_v4());
        self.dir.save(&file_name, &upload.bytes).await?;

        let audio = ChapterAudio {
            audio_status: AudioStatus::Completed,
            audio_url: Some(self.dir.public_url(&file_name)),
            audio_source: Some(AudioSource::Upload),
            audio_duration: upload.duration,
            audio_generated_at: Some(jiff::Timestamp::now()),
        };
        self.store.set_audio(chapter_id, audio.clone()).await?;

        Ok(AudioResult {
            audio_url: audio.audio_url,
            audio_status: audio.audio_status,
            audio_duration: audio.audio_duration,
        })
    }

    /// Render a chapter's narration via the TTS service
    ///
    /// State machine: `none/failed/completed → processing → {completed,
    /// failed}`. The `processing` mark is persisted before the external call,
    /// so a crash mid-call leaves the chapter visibly stuck for the recovery
    /// command to pick up. A handled error always lands the chapter on
    /// `failed` before propagating.
    pub async fn generate_audio(&self, chapter_id: ChapterId) -> Result<AudioResult> {
        let chapter = self.require_chapter(chapter_id).await?;

        if chapter.audio.audio_status == AudioStatus::Processing {
            return Err(AudioError::InvalidRequest(
                "chapter audio is already being generated".to_string(),
            ));
        }

        self.store.set_status(chapter_id, AudioStatus::Processing).await?;

        let request = SynthesizeRequest {
            text: chapter.content,
            chapter_id: chapter_id.to_string(),
            novel_id: chapter.novel_id.to_string(),
        };

        let response = match self.tts.synthesize(&request).await {
            Ok(response) => response,
            Err(e) => {
                if let Err(rollback) = self.store.set_status(chapter_id, AudioStatus::Failed).await {
                    tracing::error!(%chapter_id, error = %rollback, "failed to mark chapter failed");
                }
                return Err(e.into());
            }
        };

        let output_file = if response.success { response.output_file } else { None };
        let Some(output_file) = output_file else {
            self.store.set_status(chapter_id, AudioStatus::Failed).await?;
            return Err(AudioError::Upstream(
                response.error.unwrap_or_else(|| "TTS generation failed".to_string()),
            ));
        };

        let (audio_url, source) = self.migrate_render(&output_file, response.audio_url).await;

        let audio = ChapterAudio {
            audio_status: AudioStatus::Completed,
            audio_url: Some(audio_url),
            audio_source: Some(source),
            audio_duration: response.duration,
            audio_generated_at: Some(jiff::Timestamp::now()),
        };
        self.store.set_audio(chapter_id, audio.clone()).await?;

        tracing::info!(%chapter_id, source = ?source, "chapter narration generated");

        Ok(AudioResult {
            audio_url: audio.audio_url,
            audio_status: audio.audio_status,
            audio_duration: audio.audio_duration,
        })
    }

    /// Resolve the final URL for a TTS render, migrating it to the cloud
    /// store when a token is configured and the local file exists
    ///
    /// Cloud failure is not terminal: the TTS-provided URL (or the local
    /// path) is kept and the file stays on disk for a later sync pass.
    pub(crate) async fn migrate_render(&self, output_file: &str, tts_url: Option<String>) -> (String, AudioSource) {
        let fallback = tts_url.unwrap_or_else(|| self.dir.public_url(output_file));

        let Some(cloud) = &self.cloud else {
            return (fallback, AudioSource::Tts);
        };

        let local_path = self.dir.local_path(output_file);
        let bytes = match tokio::fs::read(&local_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (fallback, AudioSource::Tts),
            Err(e) => {
                tracing::warn!(file = output_file, error = %e, "could not read render for cloud upload");
                return (fallback, AudioSource::Tts);
            }
        };

        match cloud.upload_file(output_file, bytes).await {
            Ok(url) => {
                if let Err(e) = self.dir.remove(&local_path).await {
                    tracing::warn!(file = output_file, error = %e, "failed to delete migrated render");
                }
                (url, AudioSource::Uploadthing)
            }
            Err(e) => {
                tracing::warn!(file = output_file, error = %e, "cloud upload failed, keeping local render");
                (fallback, AudioSource::Tts)
            }
        }
    }

    /// Remove a chapter's audio
    ///
    /// Deletes the backing file when the URL is local; cloud files are never
    /// deleted. A chapter without audio is a caller error.
    pub async fn delete_audio(&self, chapter_id: ChapterId) -> Result<()> {
        let chapter = self.require_chapter(chapter_id).await?;

        let Some(url) = &chapter.audio.audio_url else {
            return Err(AudioError::InvalidRequest("chapter has no audio".to_string()));
        };

        if let Some(path) = self.dir.path_for_url(url) {
            self.dir.remove(&path).await?;
        }

        self.store.set_audio(chapter_id, ChapterAudio::default()).await?;
        Ok(())
    }

    pub async fn chapter_info(&self, chapter_id: ChapterId) -> Result<ChapterAudioInfo> {
        let chapter = self.require_chapter(chapter_id).await?;
        Ok(ChapterAudioInfo::from(chapter))
    }

    pub async fn novel_audio_list(&self, novel_id: NovelId) -> Result<NovelAudioList> {
        self.require_novel(novel_id).await?;
        let chapters = self.store.novel_chapters(novel_id).await?;
        Ok(NovelAudioList::from_chapters(chapters))
    }

    /// Probe the TTS service's health endpoint
    pub async fn tts_health(&self) -> Result<TtsHealth> {
        let payload = self.tts.health().await?;
        Ok(TtsHealth {
            tts_service: payload,
            service_url: self.tts.base_url().to_string(),
        })
    }
}
