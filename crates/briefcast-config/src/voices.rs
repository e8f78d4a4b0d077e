use indexmap::IndexMap;
use serde::Deserialize;

/// Speaker-to-voice mapping and the voice catalog
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoicesConfig {
    /// Voice used for speakers without a mapping
    #[serde(rename = "default", default = "default_voice")]
    pub default_voice: String,
    /// Speaker label to provider voice id
    #[serde(default)]
    pub speakers: IndexMap<String, String>,
    /// Catalog exposed by the voices endpoint
    #[serde(default)]
    pub catalog: Vec<VoiceEntry>,
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            speakers: IndexMap::new(),
            catalog: Vec::new(),
        }
    }
}

/// One selectable voice in the catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceEntry {
    /// Provider voice id, optionally `provider/` prefixed
    pub id: String,
    /// Human-facing name
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_voice() -> String {
    "alloy".to_string()
}
