//! Client for the UploadThing-compatible cloud file store
//!
//! Narration audio is rendered to local disk first and migrated here exactly
//! once; the cloud URL then replaces the local path on the chapter document.
//! This service never deletes cloud files.

#![allow(clippy::must_use_candidate)]

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

const API_KEY_HEADER: &str = "x-uploadthing-api-key";

/// Errors returned by the cloud storage client
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// HTTP transport or connection error
    #[error("cloud upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("cloud storage error ({status}): {message}")]
    Api {
        /// HTTP status from the provider
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Provider accepted the request but returned no URL for the file
    #[error("cloud upload rejected: {0}")]
    Rejected(String),
}

/// Per-file entry of the upload response
#[derive(Debug, Deserialize)]
struct FileResult {
    #[serde(default)]
    data: Option<FileData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileData {
    url: String,
}

/// Async HTTP client for the cloud file store
#[derive(Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl CloudClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: Url, api_key: SecretString) -> Result<Self, CloudError> {
        let http = reqwest::Client::builder().build().map_err(CloudError::Request)?;

        Ok(Self { http, base_url, api_key })
    }

    /// Upload one file, returning its public URL
    ///
    /// POST `/v1/upload-files` (multipart)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the provider rejects it,
    /// or the response carries no URL for the file
    pub async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, CloudError> {
        let url = self.base_url.join("v1/upload-files").map_err(|e| CloudError::Api {
            status: 0,
            message: format!("invalid URL: {e}"),
        })?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CloudError::Api { status, message });
        }

        let results: Vec<FileResult> = response.json().await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| CloudError::Rejected("empty upload response".to_string()))?;

        match first.data {
            Some(data) => Ok(data.url),
            None => Err(CloudError::Rejected(
                first.error.unwrap_or_else(|| "no URL returned".to_string()),
            )),
        }
    }
}
