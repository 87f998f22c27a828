//! Mock cloud file-storage upstream

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub struct MockCloud {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockCloudState>,
}

struct MockCloudState {
    upload_count: AtomicU32,
}

impl MockCloud {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockCloudState {
            upload_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v1/upload-files", routing::post(handle_upload))
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

    pub fn upload_count(&self) -> u32 {
        self.state.upload_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockCloud {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_upload(State(state): State<Arc<MockCloudState>>, _body: axum::body::Bytes) -> Json<Value> {
    state.upload_count.fetch_add(1, Ordering::Relaxed);
    let file_key = uuid::Uuid::new_v4();
    Json(json!([
        {"data": {"url": format!("https://utfs.io/f/{file_key}")}}
    ]))
}
