//! Chapter narration pipeline for the Fable service
//!
//! Orchestrates audio across three places: the local upload directory, the
//! external TTS rendering service, and the cloud file store. Exposes the
//! audio HTTP surface plus the offline recovery and sync operations.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod batch;
mod error;
mod files;
mod maintenance;
mod request;
mod service;
mod types;

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fable_core::Envelope;
use fable_store::{ChapterId, NovelId};

pub use error::{AudioError, Result};
pub use maintenance::{RecoverySummary, SyncSummary};
pub use request::BatchGenerateRequest;
pub use service::AudioService;

/// The audio endpoint router
///
/// `max_upload_bytes` caps multipart bodies; anything larger is rejected
/// before the handler runs.
pub fn endpoint_router(max_upload_bytes: usize) -> Router<Arc<AudioService>> {
    Router::new()
        .route("/chapter/{chapter_id}/audio/upload", post(upload_chapter_audio))
        .route("/chapter/{chapter_id}/audio/generate", post(generate_chapter_audio))
        .route(
            "/chapter/{chapter_id}/audio",
            get(get_chapter_audio_info).delete(delete_chapter_audio),
        )
        .route("/novel/{novel_id}/audio", get(get_novel_audio_list))
        .route("/novel/{novel_id}/audio/batch-generate", post(batch_generate_audio))
        .route("/audio/batch-status/{job_id}", get(get_batch_status))
        .route("/audio/health", get(check_tts_health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

fn parse_chapter_id(raw: &str) -> Result<ChapterId> {
    ChapterId::from_str(raw).map_err(|_| AudioError::InvalidRequest("invalid chapter id".to_string()))
}

fn parse_novel_id(raw: &str) -> Result<NovelId> {
    NovelId::from_str(raw).map_err(|_| AudioError::InvalidRequest("invalid novel id".to_string()))
}

fn ok<T: serde::Serialize>(message: &str, data: T) -> Response {
    Json(Envelope::ok(message, data)).into_response()
}

async fn upload_chapter_audio(
    State(service): State<Arc<AudioService>>,
    Path(chapter_id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let chapter_id = parse_chapter_id(&chapter_id)?;
    let upload = request::parse_upload(multipart).await?;

    let result = service.upload_audio(chapter_id, upload).await?;

    Ok(ok("audio uploaded", result))
}

async fn generate_chapter_audio(
    State(service): State<Arc<AudioService>>,
    Path(chapter_id): Path<String>,
) -> Result<Response> {
    let chapter_id = parse_chapter_id(&chapter_id)?;
    let result = service.generate_audio(chapter_id).await?;

    Ok(ok("audio generated", result))
}

async fn get_chapter_audio_info(
    State(service): State<Arc<AudioService>>,
    Path(chapter_id): Path<String>,
) -> Result<Response> {
    let chapter_id = parse_chapter_id(&chapter_id)?;
    let info = service.chapter_info(chapter_id).await?;

    Ok(ok("audio info retrieved", info))
}

async fn delete_chapter_audio(
    State(service): State<Arc<AudioService>>,
    Path(chapter_id): Path<String>,
) -> Result<Response> {
    let chapter_id = parse_chapter_id(&chapter_id)?;
    service.delete_audio(chapter_id).await?;

    Ok(ok("audio deleted", ()))
}

async fn get_novel_audio_list(
    State(service): State<Arc<AudioService>>,
    Path(novel_id): Path<String>,
) -> Result<Response> {
    let novel_id = parse_novel_id(&novel_id)?;
    let list = service.novel_audio_list(novel_id).await?;

    Ok(ok("audio list retrieved", list))
}

async fn batch_generate_audio(
    State(service): State<Arc<AudioService>>,
    Path(novel_id): Path<String>,
    body: Option<Json<BatchGenerateRequest>>,
) -> Result<Response> {
    let novel_id = parse_novel_id(&novel_id)?;
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let started = service.batch_generate(novel_id, request).await?;

    Ok(ok("batch TTS job started", started))
}

async fn get_batch_status(
    State(service): State<Arc<AudioService>>,
    Path(job_id): Path<String>,
) -> Result<Response> {
    let payload = service.batch_status(&job_id).await?;

    Ok(ok("batch status retrieved", payload))
}

async fn check_tts_health(State(service): State<Arc<AudioService>>) -> Result<Response> {
    let health = service.tts_health().await?;

    Ok(ok("TTS service health check", health))
}
