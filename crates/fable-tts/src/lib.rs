//! Async client for the external TTS rendering microservice
//!
//! The service renders chapter text to audio files in the shared upload
//! directory and runs batch jobs identified by opaque job ids. This client
//! holds no job state of its own.

#![allow(clippy::must_use_candidate)]

mod types;

use std::time::Duration;

use url::Url;

pub use types::{BatchAccepted, BatchChapter, ChapterResult, JobStatus, SynthesizeRequest, SynthesizeResponse};

/// Errors returned by the TTS client
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// HTTP transport or connection error
    #[error("TTS request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// TTS service returned a non-success status
    #[error("TTS service error ({status}): {message}")]
    Api {
        /// HTTP status from the service
        status: u16,
        /// Error message from the response body
        message: String,
    },
}

/// Async HTTP client for the TTS microservice
#[derive(Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TtsClient {
    /// Create a new client
    ///
    /// `timeout` applies to every request; with `None` the transport default
    /// (no deadline) is kept, matching the original backend's behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, TtsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TtsError::Request)?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TtsError> {
        self.base_url.join(path).map_err(|e| TtsError::Api {
            status: 0,
            message: format!("invalid URL: {e}"),
        })
    }

    /// Render a single chapter synchronously
    ///
    /// POST `/tts/single`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the service rejects it
    pub async fn synthesize(&self, request: &SynthesizeRequest) -> Result<SynthesizeResponse, TtsError> {
        let response = self.http.post(self.endpoint("tts/single")?).json(request).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(TtsError::Api { status, message })
        }
    }

    /// Submit a batch rendering job
    ///
    /// POST `/tts/batch`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the service rejects it
    pub async fn submit_batch(&self, novel_id: String, chapters: Vec<BatchChapter>) -> Result<BatchAccepted, TtsError> {
        let body = types::BatchRequest { novel_id, chapters };
        let response = self.http.post(self.endpoint("tts/batch")?).json(&body).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(TtsError::Api { status, message })
        }
    }

    /// Poll a batch job's status
    ///
    /// GET `/tts/status/{job_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the service rejects it
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, TtsError> {
        let response = self.http.get(self.endpoint(&format!("tts/status/{job_id}"))?).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(TtsError::Api { status, message })
        }
    }

    /// Probe the service's health endpoint
    ///
    /// GET `/health`
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy
    pub async fn health(&self) -> Result<serde_json::Value, TtsError> {
        let response = self.http.get(self.endpoint("health")?).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(TtsError::Api { status, message })
        }
    }

    /// Base URL the client targets
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> TtsClient {
        TtsClient::new(Url::parse(base_url).unwrap(), None).unwrap()
    }

    #[tokio::test]
    async fn synthesize_sends_chapter_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tts/single"))
            .and(body_partial_json(serde_json::json!({"chapter_id": "ch-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "output_file": "chapter_1_ch-1.mp3",
                "duration": 93.4
            })))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let response = client
            .synthesize(&SynthesizeRequest {
                text: "Once upon a time".to_string(),
                chapter_id: "ch-1".to_string(),
                novel_id: "nv-1".to_string(),
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.output_file.as_deref(), Some("chapter_1_ch-1.mp3"));
        assert!(response.audio_url.is_none());
    }

    #[tokio::test]
    async fn synthesize_surfaces_upstream_failure_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tts/single"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "voice model unavailable"
            })))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let response = client
            .synthesize(&SynthesizeRequest {
                text: "text".to_string(),
                chapter_id: "ch-1".to_string(),
                novel_id: "nv-1".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("voice model unavailable"));
    }

    #[tokio::test]
    async fn submit_batch_returns_job_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tts/batch"))
            .and(body_partial_json(serde_json::json!({"novel_id": "nv-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "job_id": "job-42",
                "message": "queued 3 chapters"
            })))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let accepted = client
            .submit_batch(
                "nv-1".to_string(),
                vec![BatchChapter {
                    chapter_id: "ch-1".to_string(),
                    content: "text".to_string(),
                }],
            )
            .await
            .unwrap();

        assert!(accepted.success);
        assert_eq!(accepted.job_id.as_deref(), Some("job-42"));
    }

    #[tokio::test]
    async fn job_status_preserves_unknown_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tts/status/job-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "status": "processing",
                "progress": 40,
                "eta_seconds": 120
            })))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let status = client.job_status("job-42").await.unwrap();

        assert!(!status.is_completed());
        assert_eq!(status.extra["progress"], 40);
        assert_eq!(status.extra["eta_seconds"], 120);

        // And the extras survive re-serialization for the passthrough path
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["progress"], 40);
    }

    #[tokio::test]
    async fn http_error_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let err = client.health().await.unwrap_err();

        match err {
            TtsError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "down");
            }
            TtsError::Request(_) => panic!("expected API error"),
        }
    }
}
