use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level speech provider configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Speech provider configurations keyed by name
    ///
    /// The first entry is the default provider for voice ids without a
    /// `provider/` prefix.
    #[serde(default)]
    pub providers: IndexMap<String, SpeechProviderConfig>,
}

/// Configuration for a single speech provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: SpeechProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Synthesis model identifier sent to the provider
    #[serde(default)]
    pub model: Option<String>,
    /// Per-call timeout in seconds; expiry counts as a segment failure
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported speech providers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechProviderType {
    /// `OpenAI`-format speech API
    Openai,
    /// `ElevenLabs`
    Elevenlabs,
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    60
}
