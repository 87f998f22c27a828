use axum::extract::Multipart;
use serde::Deserialize;

use crate::error::AudioError;

/// Parsed `POST /chapter/{id}/audio/upload` form
pub struct AudioUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Narration length in seconds, when the uploader knows it
    pub duration: Option<f64>,
}

/// Pull the `audio` file and optional `duration` field out of the form
///
/// The request body size cap is enforced by the router's body limit; this
/// only validates field shape.
pub async fn parse_upload(mut multipart: Multipart) -> Result<AudioUpload, AudioError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut duration: Option<f64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AudioError::InvalidRequest(format!("malformed multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().unwrap_or("audio.mp3").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AudioError::InvalidRequest(format!("failed to read audio field: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            "duration" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AudioError::InvalidRequest(format!("failed to read duration field: {e}")))?;
                duration = Some(
                    raw.parse()
                        .map_err(|_| AudioError::InvalidRequest(format!("invalid duration value: {raw}")))?,
                );
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| AudioError::InvalidRequest("please upload an audio file".to_string()))?;

    if bytes.is_empty() {
        return Err(AudioError::InvalidRequest("uploaded audio file is empty".to_string()));
    }

    Ok(AudioUpload {
        file_name,
        bytes,
        duration,
    })
}

/// `POST /novel/{id}/audio/batch-generate` body
///
/// Selection precedence: explicit ids, then a chapter-number range, then the
/// default of every chapter still at `none` or `failed`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchGenerateRequest {
    #[serde(default)]
    pub chapter_ids: Option<Vec<String>>,
    #[serde(default)]
    pub from_chapter: Option<u32>,
    #[serde(default)]
    pub to_chapter: Option<u32>,
}
