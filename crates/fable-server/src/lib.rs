//! HTTP server assembly for the Fable narration service

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod auth;
mod cors;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use fable_audio::AudioService;
use fable_config::Config;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server and its audio service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the store connection or an upstream client fails
    /// to initialize
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let service = AudioService::from_config(&config).await?;
        Ok(Self::with_service(&config, service))
    }

    /// Assemble the router around an existing audio service
    ///
    /// Used by tests that seed the store before starting the server.
    pub fn with_service(config: &Config, service: Arc<AudioService>) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(fable_audio::endpoint_router(config.audio.max_upload_bytes).with_state(service));

        // Middleware layers, innermost first
        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        if let Some(ref auth_config) = config.auth
            && auth_config.enabled
        {
            let token = auth_config.token.clone();
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let token = token.clone();
                async move { auth::auth_middleware(token, req, next).await }
            }));
        }

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
