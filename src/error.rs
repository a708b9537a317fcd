//! Error types for voxchat

use thiserror::Error;

/// Result type alias for voxchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a chat session
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The `openai_api_key` secret is absent
    #[error(
        "OpenAI API key not found in secrets. Please add it to your secrets with the key 'openai_api_key'."
    )]
    MissingCredential,

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Chat completion error
    #[error("completion error: {0}")]
    Completion(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Stable machine-readable code for API error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::MissingCredential => "not_configured",
            Self::Stt(_) => "transcription_failed",
            Self::Completion(_) => "completion_failed",
            Self::Tts(_) => "synthesis_failed",
            Self::Io(_) => "io_failed",
            Self::Http(_) => "upstream_failed",
        }
    }
}
