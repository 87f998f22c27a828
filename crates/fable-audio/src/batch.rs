use std::str::FromStr;
use std::sync::Arc;

use fable_store::{AudioSource, AudioStatus, Chapter, ChapterAudio, ChapterId, NovelId};
use fable_tts::{BatchChapter, ChapterResult};

use crate::error::{AudioError, Result};
use crate::request::BatchGenerateRequest;
use crate::service::AudioService;
use crate::types::BatchStarted;

impl AudioService {
    /// Select the chapters a batch request targets, sorted by number
    async fn select_chapters(&self, novel_id: NovelId, request: &BatchGenerateRequest) -> Result<Vec<Chapter>> {
        if let Some(ids) = &request.chapter_ids
            && !ids.is_empty()
        {
            let mut parsed = Vec::with_capacity(ids.len());
            for raw in ids {
                parsed.push(
                    ChapterId::from_str(raw).map_err(|_| AudioError::InvalidRequest(format!("invalid chapter id: {raw}")))?,
                );
            }
            let mut chapters = self.store().chapters_by_ids(&parsed).await?;
            chapters.retain(|c| c.novel_id == novel_id);
            return Ok(chapters);
        }

        if let (Some(from), Some(to)) = (request.from_chapter, request.to_chapter) {
            let mut chapters = self.store().novel_chapters(novel_id).await?;
            chapters.retain(|c| c.chapter_number >= from && c.chapter_number <= to);
            return Ok(chapters);
        }

        // Default: everything still waiting for audio
        let mut chapters = self.store().novel_chapters(novel_id).await?;
        chapters.retain(|c| {
            matches!(c.audio.audio_status, AudioStatus::None | AudioStatus::Failed)
        });
        Ok(chapters)
    }

    /// Submit a batch rendering job for a novel
    ///
    /// Every selected chapter is marked `processing` before dispatch. If the
    /// TTS service rejects the batch, the marks are rolled back to `none`
    /// best-effort; a partial rollback failure is logged but not surfaced.
    pub async fn batch_generate(&self, novel_id: NovelId, request: BatchGenerateRequest) -> Result<BatchStarted> {
        self.require_novel(novel_id).await?;

        let chapters = self.select_chapters(novel_id, &request).await?;
        if chapters.is_empty() {
            return Err(AudioError::InvalidRequest("no chapters to process".to_string()));
        }

        let ids: Vec<ChapterId> = chapters.iter().map(|c| c.id).collect();
        let batch: Vec<BatchChapter> = chapters
            .iter()
            .map(|c| BatchChapter {
                chapter_id: c.id.to_string(),
                content: c.content.clone(),
            })
            .collect();

        self.store().set_status_many(&ids, AudioStatus::Processing).await?;

        let accepted = match self.tts().submit_batch(novel_id.to_string(), batch).await {
            Ok(accepted) if accepted.success && accepted.job_id.is_some() => accepted,
            Ok(rejected) => {
                self.rollback_batch(&ids).await;
                return Err(AudioError::Upstream(
                    rejected
                        .error
                        .or(rejected.message)
                        .unwrap_or_else(|| "TTS batch submission rejected".to_string()),
                ));
            }
            Err(e) => {
                self.rollback_batch(&ids).await;
                return Err(e.into());
            }
        };

        let job_id = accepted.job_id.unwrap_or_default();
        tracing::info!(%novel_id, job_id, chapters = ids.len(), "batch TTS job started");

        Ok(BatchStarted {
            status_url: format!("/audio/batch-status/{job_id}"),
            job_id,
            total_chapters: ids.len(),
            message: accepted.message,
        })
    }

    async fn rollback_batch(&self, ids: &[ChapterId]) {
        if let Err(e) = self.store().set_status_many(ids, AudioStatus::None).await {
            tracing::error!(error = %e, "failed to roll back batch chapter status");
        }
    }

    /// Poll a batch job, gating external completion on cloud sync
    ///
    /// The TTS render being done and the cloud migration being done are two
    /// independent conditions collapsed into one visible status: while any
    /// chapter of the job set is neither `uploadthing` nor `failed`, the
    /// reported status stays `processing` with a sync progress percentage.
    /// Each poll of a completed job also fires a reconciliation pass without
    /// awaiting it.
    pub async fn batch_status(self: Arc<Self>, job_id: &str) -> Result<serde_json::Value> {
        let status = self.tts().job_status(job_id).await?;

        if !status.success {
            return Err(AudioError::NotFound("batch job"));
        }

        let results = match (&status.results, status.is_completed()) {
            (Some(results), true) => results.clone(),
            // TTS still rendering: pass the payload through unchanged
            _ => return Ok(serde_json::to_value(&status).unwrap_or_default()),
        };

        let service = Arc::clone(&self);
        let spawned_results = results.clone();
        tokio::spawn(async move {
            service.reconcile_uploads(&spawned_results).await;
        });

        let total = results.len();
        let synced = self.count_synced(&results).await?;

        let mut value = serde_json::to_value(&status).unwrap_or_default();
        if let Some(object) = value.as_object_mut() {
            if synced < total {
                let progress = synced * 100 / total.max(1);
                object.insert("status".to_string(), "processing".into());
                object.insert("progress".to_string(), progress.into());
                object.insert("message".to_string(), format!("syncing to cloud: {synced}/{total}").into());
            } else {
                object.insert("status".to_string(), "completed".into());
                object.insert("progress".to_string(), 100.into());
                object.insert("message".to_string(), "rendering and sync complete".into());
            }
        }

        Ok(value)
    }

    /// Chapters of the job set that finished their cloud migration or failed
    async fn count_synced(&self, results: &[ChapterResult]) -> Result<usize> {
        let mut synced = 0;
        for result in results {
            let Ok(id) = ChapterId::from_str(&result.chapter_id) else {
                continue;
            };
            if let Some(chapter) = self.store().chapter(id).await? {
                let done = chapter.audio.audio_source == Some(AudioSource::Uploadthing)
                    || chapter.audio.audio_status == AudioStatus::Failed;
                if done {
                    synced += 1;
                }
            }
        }
        Ok(synced)
    }

    /// Reconcile a completed job's renders with the store and cloud
    ///
    /// Idempotent per chapter: anything already `uploadthing` or `failed` is
    /// skipped, so overlapping passes triggered by concurrent polls converge.
    /// Per-chapter errors are logged and never abort the pass.
    pub async fn reconcile_uploads(&self, results: &[ChapterResult]) {
        for result in results {
            let Ok(chapter_id) = ChapterId::from_str(&result.chapter_id) else {
                tracing::warn!(chapter_id = result.chapter_id, "skipping result with malformed chapter id");
                continue;
            };

            if let Err(e) = self.reconcile_chapter(chapter_id, result).await {
                tracing::error!(%chapter_id, error = %e, "failed to reconcile chapter render");
            }
        }
    }

    async fn reconcile_chapter(&self, chapter_id: ChapterId, result: &ChapterResult) -> Result<()> {
        let Some(chapter) = self.store().chapter(chapter_id).await? else {
            return Ok(());
        };

        // Already migrated or terminally failed: repeat polls are no-ops
        if chapter.audio.audio_source == Some(AudioSource::Uploadthing)
            || chapter.audio.audio_status == AudioStatus::Failed
        {
            return Ok(());
        }

        let output_file = if result.success { result.output_file.as_deref() } else { None };
        let Some(output_file) = output_file else {
            self.store().set_status(chapter_id, AudioStatus::Failed).await?;
            return Ok(());
        };

        let (audio_url, source) = self.migrate_render(output_file, None).await;

        self.store()
            .set_audio(
                chapter_id,
                ChapterAudio {
                    audio_status: AudioStatus::Completed,
                    audio_url: Some(audio_url),
                    audio_source: Some(source),
                    audio_duration: result.duration,
                    audio_generated_at: Some(jiff::Timestamp::now()),
                },
            )
            .await?;

        Ok(())
    }
}
