//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use briefcast_config::{
    Config, HealthConfig, ServerConfig, SpeechProviderConfig, SpeechProviderType, StorageConfig,
    VoiceEntry,
};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder writing task artifacts under `output_dir`
    pub fn new(output_dir: &Path) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                storage: StorageConfig {
                    output_dir: output_dir.to_path_buf(),
                },
                ..Config::default()
            },
        }
    }

    /// Add an OpenAI-format speech provider pointed at a mock backend
    pub fn with_speech_provider(mut self, name: &str, base_url: &str) -> Self {
        self.config.speech.providers.insert(
            name.to_owned(),
            SpeechProviderConfig {
                provider_type: SpeechProviderType::Openai,
                api_key: Some(SecretString::from("test-key")),
                base_url: Some(base_url.to_owned()),
                model: None,
                timeout_secs: 5,
            },
        );
        self
    }

    /// Map a speaker label to a voice id
    pub fn with_speaker(mut self, speaker: &str, voice: &str) -> Self {
        self.config.voices.speakers.insert(speaker.to_owned(), voice.to_owned());
        self
    }

    /// Set the default voice for unmapped speakers
    pub fn with_default_voice(mut self, voice: &str) -> Self {
        self.config.voices.default_voice = voice.to_owned();
        self
    }

    /// Add a voice catalog entry
    pub fn with_catalog_voice(mut self, id: &str, name: &str) -> Self {
        self.config.voices.catalog.push(VoiceEntry {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
        });
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
