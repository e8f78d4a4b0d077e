#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod error;
mod http_client;
mod provider;
mod types;

use std::sync::Arc;

pub use client::{SpeechClient, SpeechClientBuilder};
pub use error::{Result, SpeechError};
pub use provider::SpeechProvider;
pub use types::{SpeechClip, SpeechRequest};

/// Build the speech client from configuration
pub fn build_client(config: &briefcast_config::Config) -> anyhow::Result<Arc<SpeechClient>> {
    let client = Arc::new(
        SpeechClientBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech client: {e}"))?,
    );
    Ok(client)
}
