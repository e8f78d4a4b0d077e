mod cors;
mod error;
mod health;
mod state;
mod tts;
mod voices;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use briefcast_config::Config;
use synthesis::{Orchestrator, SpeechSource, TaskStore, VoiceResolver};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    orchestrator: Arc<Orchestrator>,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the speech client cannot be initialized or the
    /// task store cannot open the output directory
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5001)));

        let speech: Arc<dyn SpeechSource> = speech::build_client(&config)?;

        let store = Arc::new(
            TaskStore::open(config.storage.output_dir.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open task store: {e}"))?,
        );

        let orchestrator = Arc::new(Orchestrator::new(
            speech,
            Arc::clone(&store),
            VoiceResolver::from_config(&config.voices),
            tts::DOWNLOAD_ROUTE.to_string(),
        ));

        let state = AppState {
            orchestrator: Arc::clone(&orchestrator),
            store,
            voices: Arc::new(config.voices),
        };

        // Build base router with feature routes
        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Synthesis task routes
        app = app.merge(tts::router());

        // Voice catalog routes
        app = app.merge(voices::router());

        let mut app = app.with_state(state);

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS, permissive unless configured otherwise
        app = app.layer(cors::cors_layer(&config.server.cors.clone().unwrap_or_default()));

        Ok(Self {
            router: app,
            listen_address,
            orchestrator,
        })
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
    /// Blocks until the cancellation token is triggered, then waits for
    /// in-flight synthesis pipelines to reach a terminal state.
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

        self.orchestrator.shutdown().await;

        Ok(())
    }
}
