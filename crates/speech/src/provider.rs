pub mod elevenlabs;
pub mod openai;

use async_trait::async_trait;

use crate::types::{SpeechClip, SpeechRequest};

/// Trait for speech provider implementations
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize text to speech
    async fn synthesize(&self, request: SpeechRequest) -> crate::error::Result<SpeechClip>;

    /// Get the provider name
    fn name(&self) -> &str;
}
