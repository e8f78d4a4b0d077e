use briefcast_config::VoicesConfig;
use indexmap::IndexMap;

/// Maps speaker labels to provider voice ids
#[derive(Debug, Clone)]
pub struct VoiceResolver {
    speakers: IndexMap<String, String>,
    default_voice: String,
}

impl VoiceResolver {
    pub fn new(speakers: IndexMap<String, String>, default_voice: String) -> Self {
        Self { speakers, default_voice }
    }

    pub fn from_config(config: &VoicesConfig) -> Self {
        Self::new(config.speakers.clone(), config.default_voice.clone())
    }

    /// Resolve a speaker label to a voice id
    ///
    /// Unknown labels fall back to the default voice, never an error.
    pub fn resolve(&self, speaker: &str) -> &str {
        self.speakers.get(speaker).map_or(self.default_voice.as_str(), String::as_str)
    }

    /// Layer per-request voice choices over the configured mapping
    pub fn with_overrides(
        &self,
        voices: &IndexMap<String, String>,
        default_voice: Option<&str>,
    ) -> Self {
        let mut speakers = self.speakers.clone();

        for (speaker, voice) in voices {
            speakers.insert(speaker.clone(), voice.clone());
        }

        Self {
            speakers,
            default_voice: default_voice.map_or_else(|| self.default_voice.clone(), str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> VoiceResolver {
        let mut speakers = IndexMap::new();
        speakers.insert("Host".to_string(), "onyx".to_string());
        speakers.insert("Guest".to_string(), "nova".to_string());

        VoiceResolver::new(speakers, "alloy".to_string())
    }

    #[test]
    fn known_speaker_resolves_to_mapped_voice() {
        assert_eq!(resolver().resolve("Host"), "onyx");
    }

    #[test]
    fn unknown_speaker_falls_back_to_default() {
        assert_eq!(resolver().resolve("Narrator"), "alloy");
    }

    #[test]
    fn request_override_wins_over_configured_mapping() {
        let mut overrides = IndexMap::new();
        overrides.insert("Host".to_string(), "echo".to_string());

        let resolver = resolver().with_overrides(&overrides, None);

        assert_eq!(resolver.resolve("Host"), "echo");
        assert_eq!(resolver.resolve("Guest"), "nova");
    }

    #[test]
    fn request_default_replaces_configured_default() {
        let resolver = resolver().with_overrides(&IndexMap::new(), Some("shimmer"));

        assert_eq!(resolver.resolve("Narrator"), "shimmer");
        assert_eq!(resolver.resolve("Host"), "onyx");
    }
}
