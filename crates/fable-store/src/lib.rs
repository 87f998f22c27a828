//! Chapter document store for the Fable narration service
//!
//! The platform's main application owns the chapter collections; this crate
//! reads chapter text and mutates the audio field group only. Two backends:
//! an in-process map for development and tests, and the shared Redis instance
//! for deployments.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod model;
pub mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use fable_config::{StoreBackend, StoreConfig};

pub use error::StoreError;
pub use model::{AudioSource, AudioStatus, Chapter, ChapterAudio, ChapterId, Novel, NovelId};

/// Persistence operations the audio pipeline needs
///
/// Writes commit immediately; there are no cross-call transactions. The
/// read-then-write races this allows are accepted (see the pipeline crate).
#[async_trait]
pub trait ChapterStore: Send + Sync {
    async fn put_novel(&self, novel: Novel) -> Result<(), StoreError>;

    async fn put_chapter(&self, chapter: Chapter) -> Result<(), StoreError>;

    async fn novel(&self, id: NovelId) -> Result<Option<Novel>, StoreError>;

    async fn chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StoreError>;

    /// Chapters of a novel, sorted by chapter number
    async fn novel_chapters(&self, novel_id: NovelId) -> Result<Vec<Chapter>, StoreError>;

    /// Chapters matching an explicit id set (unknown ids are skipped),
    /// sorted by chapter number
    async fn chapters_by_ids(&self, ids: &[ChapterId]) -> Result<Vec<Chapter>, StoreError>;

    /// Replace a chapter's whole audio group
    async fn set_audio(&self, id: ChapterId, audio: ChapterAudio) -> Result<(), StoreError>;

    /// Flip a single chapter's audio status, leaving the rest of the group
    async fn set_status(&self, id: ChapterId, status: AudioStatus) -> Result<(), StoreError>;

    /// Bulk status flip; unknown ids are skipped
    async fn set_status_many(&self, ids: &[ChapterId], status: AudioStatus) -> Result<(), StoreError>;

    /// Scan every chapter with the given status (recovery and cloud sync)
    async fn chapters_with_status(&self, status: AudioStatus) -> Result<Vec<Chapter>, StoreError>;
}

/// Build the configured store backend
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn ChapterStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(storage::memory::MemoryStore::new())),
        StoreBackend::Redis => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| StoreError::Connection("redis backend requires store.url".to_string()))?;
            let store = storage::redis::RedisStore::connect(url, &config.namespace).await?;
            Ok(Arc::new(store))
        }
    }
}
