//! Error types for Cameo

use thiserror::Error;

/// Result type alias for Cameo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Cameo
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Persona file error
    #[error("persona error: {0}")]
    Persona(String),

    /// Audio device or codec error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("transcription error: {0}")]
    Transcribe(String),

    /// Text-to-speech error
    #[error("synthesis error: {0}")]
    Synthesize(String),

    /// Generative fallback failure (network, auth, rate-limit, malformed
    /// response). Propagated unchanged through reply resolution.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
