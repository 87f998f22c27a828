use fable_store::{AudioSource, AudioStatus, ChapterAudio};

use crate::error::{AudioError, Result};
use crate::service::AudioService;

/// Outcome of a stuck-chapter recovery scan
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecoverySummary {
    /// Render found, migrated to the cloud
    pub recovered: usize,
    /// Render found, cloud upload failed or not configured; kept local
    pub local_fallback: usize,
    /// No render on disk, chapter reset to failed
    pub reset_failed: usize,
}

/// Outcome of a cloud sync pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub migrated: usize,
    pub failed: usize,
    pub missing_files: usize,
}

impl AudioService {
    /// Reconcile chapters stuck in `processing` after an interrupted run
    ///
    /// A stuck chapter means a crash, restart, or unhandled timeout hit
    /// between the `processing` mark and the terminal write. The upload
    /// directory is the only artifact evidence: a file embedding the chapter
    /// id proves a render finished, its absence means the chapter must be
    /// reset to `failed`. Completion is never claimed without an artifact.
    /// No chapter stays `processing` after the scan.
    pub async fn recover_stuck(&self) -> Result<RecoverySummary> {
        let stuck = self.store().chapters_with_status(AudioStatus::Processing).await?;
        tracing::info!(count = stuck.len(), "scanning stuck chapters");

        let mut summary = RecoverySummary::default();

        for chapter in stuck {
            let Some(render) = self.dir().find_render(chapter.id).await? else {
                tracing::warn!(chapter_id = %chapter.id, "no render found, resetting to failed");
                self.store().set_status(chapter.id, AudioStatus::Failed).await?;
                summary.reset_failed += 1;
                continue;
            };

            let file_name = render
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let (audio_url, source) = self.migrate_render(&file_name, None).await;
            if source == AudioSource::Uploadthing {
                summary.recovered += 1;
            } else {
                summary.local_fallback += 1;
            }

            self.store()
                .set_audio(
                    chapter.id,
                    ChapterAudio {
                        audio_status: AudioStatus::Completed,
                        audio_url: Some(audio_url),
                        audio_source: Some(source),
                        audio_duration: chapter.audio.audio_duration,
                        audio_generated_at: Some(jiff::Timestamp::now()),
                    },
                )
                .await?;

            tracing::info!(chapter_id = %chapter.id, file = file_name, source = ?source, "stuck chapter recovered");
        }

        Ok(summary)
    }

    /// Migrate completed chapters whose audio still lives on local disk
    ///
    /// Requires configured cloud storage. Missing local files are counted
    /// and skipped; upload failures leave the chapter unchanged for the next
    /// pass.
    pub async fn sync_cloud(&self) -> Result<SyncSummary> {
        let Some(cloud) = self.cloud() else {
            return Err(AudioError::InvalidRequest("cloud storage is not configured".to_string()));
        };

        let completed = self.store().chapters_with_status(AudioStatus::Completed).await?;
        let mut summary = SyncSummary::default();

        for chapter in completed {
            let Some(url) = &chapter.audio.audio_url else {
                continue;
            };
            let Some(local_path) = self.dir().path_for_url(url) else {
                // Already a cloud URL
                continue;
            };

            let bytes = match tokio::fs::read(&local_path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(chapter_id = %chapter.id, path = %local_path.display(), "local audio file missing");
                    summary.missing_files += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let file_name = local_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            match cloud.upload_file(&file_name, bytes).await {
                Ok(cloud_url) => {
                    let mut audio = chapter.audio.clone();
                    audio.audio_url = Some(cloud_url);
                    audio.audio_source = Some(AudioSource::Uploadthing);
                    self.store().set_audio(chapter.id, audio).await?;

                    self.dir().remove(&local_path).await?;
                    summary.migrated += 1;
                    tracing::info!(chapter_id = %chapter.id, file = file_name, "audio migrated to cloud");
                }
                Err(e) => {
                    tracing::error!(chapter_id = %chapter.id, error = %e, "cloud upload failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
