//! Configuration management for Cameo
//!
//! Layered resolution: built-in defaults, overlaid by the TOML config file,
//! overlaid by environment variables. The result is an explicit struct
//! passed to constructors; nothing here is process-global.

pub mod file;

use std::path::{Path, PathBuf};

use crate::{Persona, Result};

/// Default OpenAI-compatible API base
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Cameo configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Active persona
    pub persona: Persona,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Chat-completion configuration
    pub chat: ChatConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// Seconds of audio captured per turn
    pub record_secs: u64,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            record_secs: 5,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// Chat-completion configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model identifier for the generative fallback
    pub model: String,

    /// API base URL for an OpenAI-compatible endpoint
    pub api_base: String,

    /// Max tokens per completion
    pub max_tokens: Option<u32>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens: None,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (STT, TTS and chat completions)
    pub openai: Option<String>,
}

impl Config {
    /// Load configuration: defaults, config file, then environment
    ///
    /// `persona_path` (usually from `--persona` / `CAMEO_PERSONA`) takes
    /// precedence over the persona path in the config file. With neither
    /// set, the built-in default persona applies.
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly named persona file cannot be loaded
    pub fn load(persona_path: Option<&Path>) -> Result<Self> {
        Self::load_with_options(persona_path, false)
    }

    /// Load configuration, optionally forcing voice off
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly named persona file cannot be loaded
    pub fn load_with_options(persona_path: Option<&Path>, disable_voice: bool) -> Result<Self> {
        let file = file::load_config_file();

        let persona = match persona_path {
            Some(path) => Persona::load(path)?,
            None => match file.persona.as_deref() {
                Some(path) => Persona::load(&PathBuf::from(path))?,
                None => Persona::default(),
            },
        };

        let mut voice = VoiceConfig::default();
        if let Some(enabled) = file.voice.enabled {
            voice.enabled = enabled;
        }
        if let Some(secs) = file.voice.record_secs {
            voice.record_secs = secs.clamp(1, 60);
        }
        if let Some(model) = file.voice.stt_model {
            voice.stt_model = model;
        }
        if let Some(model) = file.voice.tts_model {
            voice.tts_model = model;
        }
        if let Some(v) = file.voice.tts_voice {
            voice.tts_voice = v;
        }
        if let Some(speed) = file.voice.tts_speed {
            voice.tts_speed = speed;
        }

        // Persona voice preferences win over the config file
        if let Some(pv) = &persona.voice {
            if let Some(v) = &pv.tts_voice {
                voice.tts_voice = v.clone();
            }
            if let Some(speed) = pv.tts_speed {
                voice.tts_speed = speed;
            }
        }

        if disable_voice {
            voice.enabled = false;
        }

        let mut chat = ChatConfig::default();
        if let Some(model) = file.chat.model {
            chat.model = model;
        }
        if let Some(base) = file.chat.api_base {
            chat.api_base = base;
        }
        if let Some(max) = file.chat.max_tokens {
            chat.max_tokens = Some(max);
        }
        if let Ok(model) = std::env::var("CAMEO_CHAT_MODEL") {
            if !model.is_empty() {
                chat.model = model;
            }
        }
        if let Ok(base) = std::env::var("CAMEO_API_BASE") {
            if !base.is_empty() {
                chat.api_base = base;
            }
        }

        let openai = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or(file.api_keys.openai);

        Ok(Self {
            persona,
            voice,
            chat,
            api_keys: ApiKeys { openai },
        })
    }

    /// The OpenAI API key, or a config error naming how to set it
    ///
    /// # Errors
    ///
    /// Returns error if no key is configured
    pub fn openai_key(&self) -> Result<String> {
        self.api_keys.openai.clone().ok_or_else(|| {
            crate::Error::Config(
                "OpenAI API key required (set OPENAI_API_KEY or run `cameo setup`)".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_defaults_match_original_turn_length() {
        let voice = VoiceConfig::default();
        assert!(voice.enabled);
        assert_eq!(voice.record_secs, 5);
        assert_eq!(voice.stt_model, "whisper-1");
    }

    #[test]
    fn test_chat_defaults() {
        let chat = ChatConfig::default();
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.api_base, DEFAULT_API_BASE);
        assert!(chat.max_tokens.is_none());
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let config = Config {
            persona: Persona::default(),
            voice: VoiceConfig::default(),
            chat: ChatConfig::default(),
            api_keys: ApiKeys::default(),
        };

        let err = config.openai_key().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
