use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        /// Opaque document identifier
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

id_type!(ChapterId);
id_type!(NovelId);

/// Lifecycle of a chapter's narration audio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    /// No audio exists and no generation is underway
    #[default]
    None,
    /// A generation request has been dispatched and not yet resolved
    Processing,
    /// Audio exists and `audio_url` points at it
    Completed,
    /// The last generation attempt failed
    Failed,
}

/// Provenance of a chapter's current audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// Operator-uploaded file
    Upload,
    /// TTS render still on local disk
    Tts,
    /// Migrated to the cloud file store
    Uploadthing,
}

/// The audio field group owned by this service
///
/// Everything else on a chapter document belongs to the main platform; this
/// service only ever replaces this group as a whole or flips `audio_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAudio {
    #[serde(default)]
    pub audio_status: AudioStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_source: Option<AudioSource>,
    /// Narration length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_generated_at: Option<jiff::Timestamp>,
}

/// Chapter document, camelCase to match the platform's collections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub novel_id: NovelId,
    pub chapter_number: u32,
    pub title: String,
    /// Narration input text
    pub content: String,
    #[serde(flatten)]
    pub audio: ChapterAudio,
}

impl Chapter {
    /// New chapter with no audio
    pub fn new(novel_id: NovelId, chapter_number: u32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: ChapterId::new(),
            novel_id,
            chapter_number,
            title: title.into(),
            content: content.into(),
            audio: ChapterAudio::default(),
        }
    }
}

/// Novel document (existence checks and chapter listing only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    pub id: NovelId,
    pub title: String,
}

impl Novel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NovelId::new(),
            title: title.into(),
        }
    }
}
