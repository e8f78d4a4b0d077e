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

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "tts-1";

/// `OpenAI` speech provider
pub(crate) struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    name: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());
        let model = model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

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
struct OpenAiSpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
}

#[async_trait]
impl SpeechProvider for OpenAiProvider {
    async fn synthesize(&self, request: SpeechRequest) -> crate::error::Result<SpeechClip> {
        let url = format!("{}/audio/speech", self.base_url);

        tracing::debug!(
            "OpenAI speech request: model={}, voice={}, text_len={}",
            self.model,
            request.voice,
            request.text.len(),
        );

        let body = OpenAiSpeechRequest {
            model: &self.model,
            input: &request.text,
            voice: &request.voice,
            response_format: "mp3",
            speed: request.speed,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI speech request failed: {e}");
                if e.is_timeout() {
                    SpeechError::Timeout(self.timeout.as_secs())
                } else {
                    SpeechError::Connection(format!("Failed to send request to OpenAI: {e}"))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("OpenAI speech API error ({status}): {error_text}");

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
            tracing::error!("Failed to read OpenAI speech response body: {e}");
            SpeechError::Connection(format!("Failed to read response body: {e}"))
        })?;

        tracing::debug!("OpenAI speech synthesis complete, {} bytes", audio.len());

        Ok(SpeechClip {
            audio: audio.to_vec(),
            content_type,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
