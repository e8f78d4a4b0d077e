/// A single speech synthesis request
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to synthesize into speech
    pub text: String,
    /// Voice identifier, optionally prefixed with a provider name
    /// (e.g. "alloy" or "elevenlabs/21m00Tcm4TlvDq8ikWAM")
    pub voice: String,
    /// Speech speed multiplier (0.25 to 4.0)
    pub speed: Option<f64>,
    /// Emotion rendering hint, forwarded to providers that support it
    pub emotion: Option<String>,
}

/// Raw audio returned by a speech provider
#[derive(Debug)]
pub struct SpeechClip {
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: String,
}
