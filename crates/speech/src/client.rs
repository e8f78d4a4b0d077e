use briefcast_config::{SpeechProviderConfig, SpeechProviderType};
use secrecy::SecretString;

use crate::{
    error::SpeechError,
    provider::{SpeechProvider, elevenlabs::ElevenLabsProvider, openai::OpenAiProvider},
    types::{SpeechClip, SpeechRequest},
};

/// Speech client that routes requests to the appropriate provider
pub struct SpeechClient {
    providers: Vec<Box<dyn SpeechProvider>>,
}

impl SpeechClient {
    /// Synthesize text to speech using the appropriate provider
    ///
    /// Routes on the voice identifier. Voice format: "provider/voice"
    /// (e.g. "elevenlabs/21m00Tcm4TlvDq8ikWAM"); the prefix is stripped
    /// before the request reaches the provider. Without a prefix the
    /// first configured provider handles the request.
    pub async fn synthesize(&self, request: SpeechRequest) -> crate::error::Result<SpeechClip> {
        let (provider_name, voice) = match request.voice.split_once('/') {
            Some((prefix, rest)) => (Some(prefix.to_string()), rest.to_string()),
            None => (None, request.voice.clone()),
        };

        let provider = match &provider_name {
            None => self
                .providers
                .first()
                .ok_or_else(|| SpeechError::ProviderNotFound("No speech providers configured".to_string()))?,
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name() == name)
                .ok_or_else(|| SpeechError::ProviderNotFound(name.clone()))?,
        };

        provider.synthesize(SpeechRequest { voice, ..request }).await
    }
}

/// Builder for constructing the speech client from configuration
pub struct SpeechClientBuilder<'a> {
    config: &'a briefcast_config::Config,
}

impl<'a> SpeechClientBuilder<'a> {
    pub const fn new(config: &'a briefcast_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<SpeechClient> {
        let mut providers: Vec<Box<dyn SpeechProvider>> = Vec::new();

        for (name, provider_config) in &self.config.speech.providers {
            tracing::debug!("Initializing speech provider: {name}");

            let provider: Box<dyn SpeechProvider> = match &provider_config.provider_type {
                SpeechProviderType::Openai => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(OpenAiProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.model.clone(),
                        provider_config.timeout_secs,
                    ))
                }
                SpeechProviderType::Elevenlabs => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(ElevenLabsProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.model.clone(),
                        provider_config.timeout_secs,
                    ))
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No speech providers configured");
        } else {
            tracing::debug!("Speech client initialized with {} provider(s)", providers.len());
        }

        Ok(SpeechClient { providers })
    }
}

fn resolve_api_key(name: &str, config: &SpeechProviderConfig) -> crate::error::Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| SpeechError::Config(format!("API key required for speech provider '{name}'")))
}
