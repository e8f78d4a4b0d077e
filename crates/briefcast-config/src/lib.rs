#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod speech;
pub mod storage;
pub mod telemetry;
pub mod voices;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use server::*;
pub use speech::*;
pub use storage::*;
pub use telemetry::*;
pub use voices::*;

/// Top-level briefcast configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Speech provider configuration
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Speaker-to-voice mapping and the voice catalog
    #[serde(default)]
    pub voices: VoicesConfig,
    /// Task artifact storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
