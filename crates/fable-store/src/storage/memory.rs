use async_trait::async_trait;
use dashmap::DashMap;

use crate::{AudioStatus, Chapter, ChapterAudio, ChapterId, ChapterStore, Novel, NovelId, StoreError};

/// In-process store backed by concurrent maps, for development and tests
#[derive(Default)]
pub struct MemoryStore {
    novels: DashMap<NovelId, Novel>,
    chapters: DashMap<ChapterId, Chapter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_number(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.sort_by_key(|c| c.chapter_number);
    chapters
}

#[async_trait]
impl ChapterStore for MemoryStore {
    async fn put_novel(&self, novel: Novel) -> Result<(), StoreError> {
        self.novels.insert(novel.id, novel);
        Ok(())
    }

    async fn put_chapter(&self, chapter: Chapter) -> Result<(), StoreError> {
        self.chapters.insert(chapter.id, chapter);
        Ok(())
    }

    async fn novel(&self, id: NovelId) -> Result<Option<Novel>, StoreError> {
        Ok(self.novels.get(&id).map(|n| n.clone()))
    }

    async fn chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StoreError> {
        Ok(self.chapters.get(&id).map(|c| c.clone()))
    }

    async fn novel_chapters(&self, novel_id: NovelId) -> Result<Vec<Chapter>, StoreError> {
        let chapters = self
            .chapters
            .iter()
            .filter(|entry| entry.novel_id == novel_id)
            .map(|entry| entry.clone())
            .collect();
        Ok(sort_by_number(chapters))
    }

    async fn chapters_by_ids(&self, ids: &[ChapterId]) -> Result<Vec<Chapter>, StoreError> {
        let chapters = ids
            .iter()
            .filter_map(|id| self.chapters.get(id).map(|c| c.clone()))
            .collect();
        Ok(sort_by_number(chapters))
    }

    async fn set_audio(&self, id: ChapterId, audio: ChapterAudio) -> Result<(), StoreError> {
        let mut chapter = self.chapters.get_mut(&id).ok_or(StoreError::ChapterNotFound(id))?;
        chapter.audio = audio;
        Ok(())
    }

    async fn set_status(&self, id: ChapterId, status: AudioStatus) -> Result<(), StoreError> {
        let mut chapter = self.chapters.get_mut(&id).ok_or(StoreError::ChapterNotFound(id))?;
        chapter.audio.audio_status = status;
        Ok(())
    }

    async fn set_status_many(&self, ids: &[ChapterId], status: AudioStatus) -> Result<(), StoreError> {
        for id in ids {
            if let Some(mut chapter) = self.chapters.get_mut(id) {
                chapter.audio.audio_status = status;
            }
        }
        Ok(())
    }

    async fn chapters_with_status(&self, status: AudioStatus) -> Result<Vec<Chapter>, StoreError> {
        let chapters = self
            .chapters
            .iter()
            .filter(|entry| entry.audio.audio_status == status)
            .map(|entry| entry.clone())
            .collect();
        Ok(sort_by_number(chapters))
    }
}
