use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no speech provider is configured or the voice
    /// table references an unknown provider
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_speech_config()?;
        self.validate_voices_config()?;
        Ok(())
    }

    fn validate_speech_config(&self) -> anyhow::Result<()> {
        if self.speech.providers.is_empty() {
            anyhow::bail!("at least one speech provider must be configured");
        }

        for (name, provider) in &self.speech.providers {
            if provider.timeout_secs == 0 {
                anyhow::bail!("speech provider '{name}' must have a timeout greater than 0");
            }
        }

        Ok(())
    }

    /// Voice ids may carry a `provider/` prefix; the prefix must name a
    /// configured provider
    fn validate_voices_config(&self) -> anyhow::Result<()> {
        if self.voices.default_voice.trim().is_empty() {
            anyhow::bail!("voices.default must not be empty");
        }

        let configured = std::iter::once(&self.voices.default_voice).chain(self.voices.speakers.values());
        for voice in configured {
            if let Some((provider, _)) = voice.split_once('/')
                && !self.speech.providers.contains_key(provider)
            {
                anyhow::bail!("voice '{voice}' references unknown speech provider '{provider}'");
            }
        }

        for (speaker, voice) in &self.voices.speakers {
            if voice.trim().is_empty() {
                anyhow::bail!("voice id for speaker '{speaker}' must not be empty");
            }
        }

        Ok(())
    }
}
