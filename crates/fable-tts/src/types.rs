use serde::{Deserialize, Serialize};

/// `POST /tts/single` request body
#[derive(Debug, Serialize)]
pub struct SynthesizeRequest {
    pub text: String,
    pub chapter_id: String,
    pub novel_id: String,
}

/// `POST /tts/single` response
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizeResponse {
    pub success: bool,
    /// Filename of the rendered file inside the shared upload directory
    #[serde(default)]
    pub output_file: Option<String>,
    /// URL the TTS service itself serves the render under, when it does
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Narration length in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One chapter of a batch submission
#[derive(Debug, Serialize)]
pub struct BatchChapter {
    pub chapter_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest {
    pub novel_id: String,
    pub chapters: Vec<BatchChapter>,
}

/// `POST /tts/batch` response
#[derive(Debug, Clone, Deserialize)]
pub struct BatchAccepted {
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-chapter outcome inside a completed job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterResult {
    pub chapter_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /tts/status/{job_id}` response
///
/// The poll endpoint passes this payload through to the caller, so unknown
/// upstream fields are kept in `extra` and serialized back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub success: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ChapterResult>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobStatus {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}
