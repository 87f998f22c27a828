use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fable_core::{Envelope, ErrorCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio pipeline errors with their envelope mapping
///
/// Upstream TTS and cloud failures map to 500 `INTERNAL_ERROR`: a failed
/// external call is terminal for the invocation and the caller either
/// re-generates or runs the recovery command.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Malformed id, missing file, already-processing, empty selection
    #[error("{0}")]
    InvalidRequest(String),

    /// Missing chapter, novel, or batch job
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Store read or write failed
    #[error("store error: {0}")]
    Store(#[from] fable_store::StoreError),

    /// TTS service call failed at the transport or HTTP level
    #[error("TTS service error: {0}")]
    Tts(#[from] fable_tts::TtsError),

    /// Cloud upload failed
    #[error("cloud storage error: {0}")]
    Cloud(#[from] fable_cloud::CloudError),

    /// Local audio file could not be read or written
    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    /// TTS reported a failure in an otherwise successful response
    #[error("{0}")]
    Upstream(String),
}

impl AudioError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Tts(_) | Self::Cloud(_) | Self::Io(_) | Self::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_) => ErrorCode::BadRequest,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Store(_) | Self::Tts(_) | Self::Cloud(_) | Self::Io(_) | Self::Upstream(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            // Internal failures keep details in the logs, not the envelope
            Self::Store(_) | Self::Io(_) => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AudioError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "audio request failed");
        }

        let envelope = Envelope::fail(self.client_message(), self.error_code());
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let err = AudioError::InvalidRequest("invalid chapter id".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), ErrorCode::BadRequest);
        assert_eq!(err.client_message(), "invalid chapter id");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = AudioError::NotFound("chapter");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_message(), "chapter not found");
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let err = AudioError::Store(fable_store::StoreError::Connection("redis://secret-host".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn upstream_message_is_surfaced() {
        let err = AudioError::Upstream("voice model unavailable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "voice model unavailable");
    }
}
