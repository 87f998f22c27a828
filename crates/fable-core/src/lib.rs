//! Shared response vocabulary for the Fable narration service
//!
//! Every HTTP endpoint answers with the same JSON envelope, success and
//! failure alike, so the platform frontend can handle responses uniformly.

#![allow(clippy::must_use_candidate)]

use serde::Serialize;

/// Machine-readable code carried in failure envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Unauthorized,
    InternalError,
}

/// Error payload attached to failure envelopes
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
}

/// Uniform response envelope
///
/// `data` is present on success (possibly `null`), `error` on failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
    /// Build a success envelope wrapping `data`
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Build a failure envelope carrying an error code
    pub fn fail(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ErrorBody { code }),
        }
    }
}
