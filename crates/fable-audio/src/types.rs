use fable_store::{AudioSource, AudioStatus, Chapter, ChapterId};
use serde::Serialize;

/// Payload returned by upload and generate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResult {
    pub audio_url: Option<String>,
    pub audio_status: AudioStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
}

/// `GET /chapter/{id}/audio` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAudioInfo {
    pub chapter_id: ChapterId,
    pub chapter_number: u32,
    pub title: String,
    pub audio_url: Option<String>,
    pub audio_status: AudioStatus,
    pub audio_duration: Option<f64>,
    pub audio_generated_at: Option<jiff::Timestamp>,
    pub audio_source: Option<AudioSource>,
}

impl From<Chapter> for ChapterAudioInfo {
    fn from(chapter: Chapter) -> Self {
        Self {
            chapter_id: chapter.id,
            chapter_number: chapter.chapter_number,
            title: chapter.title,
            audio_url: chapter.audio.audio_url,
            audio_status: chapter.audio.audio_status,
            audio_duration: chapter.audio.audio_duration,
            audio_generated_at: chapter.audio.audio_generated_at,
            audio_source: chapter.audio.audio_source,
        }
    }
}

/// Per-novel audio totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelAudioStats {
    pub total: usize,
    pub with_audio: usize,
    pub processing: usize,
    pub failed: usize,
    pub none: usize,
    pub total_duration: f64,
}

/// `GET /novel/{id}/audio` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelAudioList {
    pub chapters: Vec<ChapterAudioInfo>,
    pub stats: NovelAudioStats,
}

impl NovelAudioList {
    pub fn from_chapters(chapters: Vec<Chapter>) -> Self {
        let stats = NovelAudioStats {
            total: chapters.len(),
            with_audio: count_status(&chapters, AudioStatus::Completed),
            processing: count_status(&chapters, AudioStatus::Processing),
            failed: count_status(&chapters, AudioStatus::Failed),
            none: count_status(&chapters, AudioStatus::None),
            total_duration: chapters.iter().filter_map(|c| c.audio.audio_duration).sum(),
        };

        Self {
            chapters: chapters.into_iter().map(ChapterAudioInfo::from).collect(),
            stats,
        }
    }
}

fn count_status(chapters: &[Chapter], status: AudioStatus) -> usize {
    chapters.iter().filter(|c| c.audio.audio_status == status).count()
}

/// `POST /novel/{id}/audio/batch-generate` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStarted {
    pub job_id: String,
    pub total_chapters: usize,
    pub status_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /audio/health` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsHealth {
    pub tts_service: serde_json::Value,
    pub service_url: String,
}
