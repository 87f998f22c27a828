use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::{AudioStatus, Chapter, ChapterAudio, ChapterId, ChapterStore, Novel, NovelId, StoreError};

/// Store backed by the platform's shared Redis instance
///
/// Documents are JSON strings under `{ns}:chapter:{id}` and `{ns}:novel:{id}`;
/// a `{ns}:novel:{id}:chapters` set indexes a novel's chapters. Status scans
/// walk `{ns}:chapter:*` with SCAN, which is acceptable at maintenance-script
/// cadence.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    /// Connect and build the connection manager
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    fn chapter_key(&self, id: ChapterId) -> String {
        format!("{}:chapter:{id}", self.namespace)
    }

    fn novel_key(&self, id: NovelId) -> String {
        format!("{}:novel:{id}", self.namespace)
    }

    fn novel_index_key(&self, id: NovelId) -> String {
        format!("{}:novel:{id}:chapters", self.namespace)
    }

    async fn read_chapter(&self, key: &str) -> Result<Option<Chapter>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
    }

    async fn write_chapter(&self, chapter: &Chapter) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let raw = serde_json::to_string(chapter).map_err(|source| StoreError::Corrupt {
            key: self.chapter_key(chapter.id),
            source,
        })?;
        let _: () = conn.set(self.chapter_key(chapter.id), raw).await?;
        Ok(())
    }

    /// Walk every chapter key in the namespace
    async fn scan_chapters(&self) -> Result<Vec<Chapter>, StoreError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}:chapter:*", self.namespace);
        let mut chapters = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await?;

            for key in keys {
                if let Some(chapter) = self.read_chapter(&key).await? {
                    chapters.push(chapter);
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(chapters)
    }
}

fn sort_by_number(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.sort_by_key(|c| c.chapter_number);
    chapters
}

#[async_trait]
impl ChapterStore for RedisStore {
    async fn put_novel(&self, novel: Novel) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = self.novel_key(novel.id);
        let raw = serde_json::to_string(&novel).map_err(|source| StoreError::Corrupt {
            key: key.clone(),
            source,
        })?;
        let _: () = conn.set(key, raw).await?;
        Ok(())
    }

    async fn put_chapter(&self, chapter: Chapter) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .sadd(self.novel_index_key(chapter.novel_id), chapter.id.to_string())
            .await?;
        self.write_chapter(&chapter).await
    }

    async fn novel(&self, id: NovelId) -> Result<Option<Novel>, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.novel_key(id);
        let raw: Option<String> = conn.get(&key).await?;
        raw.map(|raw| serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source }))
            .transpose()
    }

    async fn chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StoreError> {
        self.read_chapter(&self.chapter_key(id)).await
    }

    async fn novel_chapters(&self, novel_id: NovelId) -> Result<Vec<Chapter>, StoreError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.smembers(self.novel_index_key(novel_id)).await?;

        let mut chapters = Vec::with_capacity(ids.len());
        for id in ids {
            let key = format!("{}:chapter:{id}", self.namespace);
            // Index entries without a document are stale; skip them
            if let Some(chapter) = self.read_chapter(&key).await? {
                chapters.push(chapter);
            }
        }

        Ok(sort_by_number(chapters))
    }

    async fn chapters_by_ids(&self, ids: &[ChapterId]) -> Result<Vec<Chapter>, StoreError> {
        let mut chapters = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(chapter) = self.read_chapter(&self.chapter_key(*id)).await? {
                chapters.push(chapter);
            }
        }
        Ok(sort_by_number(chapters))
    }

    async fn set_audio(&self, id: ChapterId, audio: ChapterAudio) -> Result<(), StoreError> {
        let mut chapter = self
            .read_chapter(&self.chapter_key(id))
            .await?
            .ok_or(StoreError::ChapterNotFound(id))?;
        chapter.audio = audio;
        self.write_chapter(&chapter).await
    }

    async fn set_status(&self, id: ChapterId, status: AudioStatus) -> Result<(), StoreError> {
        let mut chapter = self
            .read_chapter(&self.chapter_key(id))
            .await?
            .ok_or(StoreError::ChapterNotFound(id))?;
        chapter.audio.audio_status = status;
        self.write_chapter(&chapter).await
    }

    async fn set_status_many(&self, ids: &[ChapterId], status: AudioStatus) -> Result<(), StoreError> {
        for id in ids {
            if let Some(mut chapter) = self.read_chapter(&self.chapter_key(*id)).await? {
                chapter.audio.audio_status = status;
                self.write_chapter(&chapter).await?;
            }
        }
        Ok(())
    }

    async fn chapters_with_status(&self, status: AudioStatus) -> Result<Vec<Chapter>, StoreError> {
        let mut chapters = self.scan_chapters().await?;
        chapters.retain(|c| c.audio.audio_status == status);
        Ok(sort_by_number(chapters))
    }
}
