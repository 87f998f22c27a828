//! Mock TTS rendering service
//!
//! Mimics the external microservice: renders land as files in the shared
//! upload directory, batch jobs answer from a scripted status payload.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use axum::extract::{Path, State};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub struct MockTts {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockTtsState>,
}

struct MockTtsState {
    /// Directory renders are written into, shared with the service under test
    upload_dir: PathBuf,
    /// When set, `/tts/single` reports a synthesis failure
    fail_single: AtomicBool,
    single_count: AtomicU32,
    batch_count: AtomicU32,
    /// Scripted `/tts/status/{job_id}` payload
    job_status: std::sync::Mutex<Value>,
}

impl MockTts {
    pub async fn start(upload_dir: &std::path::Path) -> anyhow::Result<Self> {
        let state = Arc::new(MockTtsState {
            upload_dir: upload_dir.to_path_buf(),
            fail_single: AtomicBool::new(false),
            single_count: AtomicU32::new(0),
            batch_count: AtomicU32::new(0),
            job_status: std::sync::Mutex::new(json!({"success": false})),
        });

        let app = Router::new()
            .route("/tts/single", routing::post(handle_single))
            .route("/tts/batch", routing::post(handle_batch))
            .route("/tts/status/{job_id}", routing::get(handle_status))
            .route("/health", routing::get(handle_health))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Make subsequent single-chapter renders fail
    pub fn fail_single(&self) {
        self.state.fail_single.store(true, Ordering::Relaxed);
    }

    /// Script the payload returned for any job-status poll
    pub fn set_job_status(&self, payload: Value) {
        *self.state.job_status.lock().unwrap() = payload;
    }

    pub fn single_count(&self) -> u32 {
        self.state.single_count.load(Ordering::Relaxed)
    }

    pub fn batch_count(&self) -> u32 {
        self.state.batch_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockTts {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_single(State(state): State<Arc<MockTtsState>>, Json(body): Json<Value>) -> Json<Value> {
    state.single_count.fetch_add(1, Ordering::Relaxed);

    if state.fail_single.load(Ordering::Relaxed) {
        return Json(json!({"success": false, "error": "synthesis failed"}));
    }

    let chapter_id = body["chapter_id"].as_str().unwrap_or("unknown");
    let file_name = format!("render_{chapter_id}.mp3");

    // Render lands in the shared upload directory, like the real service
    std::fs::create_dir_all(&state.upload_dir).ok();
    std::fs::write(state.upload_dir.join(&file_name), b"ID3 mock render").ok();

    Json(json!({
        "success": true,
        "output_file": file_name,
        "duration": 12.5
    }))
}

async fn handle_batch(State(state): State<Arc<MockTtsState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.batch_count.fetch_add(1, Ordering::Relaxed);
    Json(json!({
        "success": true,
        "job_id": "job-1",
        "message": "queued"
    }))
}

async fn handle_status(State(state): State<Arc<MockTtsState>>, Path(_job_id): Path<String>) -> Json<Value> {
    Json(state.job_status.lock().unwrap().clone())
}

async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok", "engine": "mock"}))
}
