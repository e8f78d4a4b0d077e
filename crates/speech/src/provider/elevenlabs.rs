use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::SpeechError,
    http_client::http_client,
    types::{SpeechClip, SpeechRequest},
};

use super::SpeechProvider;

const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";
const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

/// `ElevenLabs` speech provider
pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    name: String,
    timeout: Duration,
}

impl ElevenLabsProvider {
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_ELEVENLABS_API_URL.to_string());
        let model = model.unwrap_or_else(|| DEFAULT_ELEVENLABS_MODEL.to_string());

        Self {
            client,
            base_url,
            api_key,
            model,
            name,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(serde::Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, request: SpeechRequest) -> crate::error::Result<SpeechClip> {
        let url = format!("{}/text-to-speech/{}", self.base_url, request.voice);

        tracing::debug!(
            "ElevenLabs speech request: model={}, voice={}, text_len={}",
            self.model,
            request.voice,
            request.text.len(),
        );

        let body = ElevenLabsRequest {
            text: &request.text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret().to_string())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("ElevenLabs request failed: {e}");
                if e.is_timeout() {
                    SpeechError::Timeout(self.timeout.as_secs())
                } else {
                    SpeechError::Connection(format!("Failed to send request to ElevenLabs: {e}"))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("ElevenLabs API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 => SpeechError::AuthenticationFailed(error_text),
                400 => SpeechError::InvalidRequest(error_text),
                _ => SpeechError::ProviderApi {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read ElevenLabs response body: {e}");
            SpeechError::Connection(format!("Failed to read response body: {e}"))
        })?;

        tracing::debug!("ElevenLabs speech synthesis complete, {} bytes", audio.len());

        Ok(SpeechClip {
            audio: audio.to_vec(),
            content_type,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
