use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpeechError>;

/// Speech provider errors
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (missing or invalid API key)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider not found in configuration
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// Provider API returned an error
    #[error("Provider API error ({status}): {message}")]
    ProviderApi { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Provider call exceeded its deadline
    #[error("Provider call timed out after {0}s")]
    Timeout(u64),

    /// Provider returned a zero-length clip
    #[error("Provider returned empty audio")]
    EmptyAudio,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
