//! Mock speech provider for integration tests
//!
//! Implements a minimal OpenAI-format speech endpoint that returns
//! deterministic bytes derived from the requested voice and input text,
//! so merged artifacts can be checked byte-for-byte

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock speech provider that returns predictable clips
pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSpeechState>,
}

struct MockSpeechState {
    request_count: AtomicU32,
    /// Number of requests to fail before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Requests whose input contains this marker fail with 500
    fail_marker: Option<String>,
    /// Pause before answering each request
    delay: Option<Duration>,
}

impl MockSpeech {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, None, None).await
    }

    /// Start a mock server that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, None, None).await
    }

    /// Start a mock server that fails any request whose input contains `marker`
    pub async fn start_failing_on(marker: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, Some(marker.to_owned()), None).await
    }

    /// Start a mock server that pauses before answering each request
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(0, None, Some(delay)).await
    }

    async fn start_inner(
        fail_count: u32,
        fail_marker: Option<String>,
        delay: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockSpeechState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            fail_marker,
            delay,
        });

        let app = Router::new()
            .route("/v1/audio/speech", routing::post(handle_speech))
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

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the OpenAI-format provider appends `/audio/speech`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of synthesis requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// The clip bytes the mock returns for a given voice and input
pub fn clip_bytes(voice: &str, input: &str) -> Vec<u8> {
    format!("[{voice}:{input}]").into_bytes()
}

#[derive(Debug, Deserialize)]
struct SpeechBody {
    #[allow(dead_code)]
    model: String,
    input: String,
    voice: String,
}

async fn handle_speech(
    State(state): State<Arc<MockSpeechState>>,
    Json(req): Json<SpeechBody>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    // If fail_count > 0, decrement and return 500
    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock provider intentional failure")
            .into_response();
    }

    if let Some(marker) = &state.fail_marker
        && req.input.contains(marker)
    {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock provider intentional failure")
            .into_response();
    }

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "audio/mpeg")],
        clip_bytes(&req.voice, &req.input),
    )
        .into_response()
}
