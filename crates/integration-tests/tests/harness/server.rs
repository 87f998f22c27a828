//! Test server wrapper that starts Fable on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use fable_audio::AudioService;
use fable_config::Config;
use fable_server::Server;
use fable_store::storage::memory::MemoryStore;
use fable_store::{AudioStatus, Chapter, ChapterStore, Novel};
use tokio_util::sync::CancellationToken;

/// A running test server instance with a seedable memory store
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    store: Arc<dyn ChapterStore>,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment; the memory store is
    /// created here so tests can seed it before and inspect it after calls.
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn ChapterStore> = Arc::new(MemoryStore::new());
        let service = AudioService::with_store(&config, Arc::clone(&store))?;
        let server = Server::with_service(&config, service);

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            store,
        })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Handle to the underlying store for seeding and assertions
    pub fn store(&self) -> &Arc<dyn ChapterStore> {
        &self.store
    }

    /// Seed one novel with chapters at the given statuses, returning the
    /// novel and its chapters in chapter-number order
    pub async fn seed_novel(&self, statuses: &[AudioStatus]) -> (Novel, Vec<Chapter>) {
        let novel = Novel::new("The Clockwork Orchard");
        self.store.put_novel(novel.clone()).await.unwrap();

        let mut chapters = Vec::new();
        for (i, status) in statuses.iter().enumerate() {
            let number = u32::try_from(i).unwrap() + 1;
            let mut chapter = Chapter::new(novel.id, number, format!("Chapter {number}"), "The orchard ticked softly.");
            chapter.audio.audio_status = *status;
            self.store.put_chapter(chapter.clone()).await.unwrap();
            chapters.push(chapter);
        }

        (novel, chapters)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
