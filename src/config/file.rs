//! TOML configuration file loading
//!
//! Supports `~/.config/cameo/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults. The same schema is written back by `cameo setup`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CameoConfigFile {
    /// Path to a persona TOML file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,

    /// Chat-completion configuration
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Chat-completion configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatFileConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API base URL for an OpenAI-compatible endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Max tokens per completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Seconds of audio captured per turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_secs: Option<u64>,

    /// STT model (e.g. "whisper-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_speed: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `CameoConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> CameoConfigFile {
    let Some(path) = config_file_path() else {
        return CameoConfigFile::default();
    };

    if !path.exists() {
        return CameoConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                CameoConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            CameoConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/cameo/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("cameo").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_parses() {
        let file: CameoConfigFile = toml::from_str(
            r#"
persona = "personas/riley.toml"

[voice]
record_secs = 7
"#,
        )
        .unwrap();

        assert_eq!(file.persona.as_deref(), Some("personas/riley.toml"));
        assert_eq!(file.voice.record_secs, Some(7));
        assert!(file.chat.model.is_none());
        assert!(file.api_keys.openai.is_none());
    }

    #[test]
    fn test_empty_file_parses() {
        let file: CameoConfigFile = toml::from_str("").unwrap();
        assert!(file.persona.is_none());
    }
}
