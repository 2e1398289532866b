//! Persona configuration
//!
//! A persona defines who the bot speaks as: the intro line, the canned
//! reply rules, the system prompt handed to the generative fallback, and
//! optional voice overrides. Loaded once from a TOML file at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::resolver::ReplyRule;
use crate::{Error, Result};

/// A persona for the voice bot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Persona {
    /// Display name, used in the intro and transcript
    pub name: String,

    /// One-line self description shown at session start
    #[serde(default)]
    pub tagline: String,

    /// System prompt for the generative fallback
    #[serde(default)]
    pub system_prompt: String,

    /// Example questions surfaced to the user
    #[serde(default)]
    pub example_questions: Vec<String>,

    /// Canned reply rules, ordered most specific first
    #[serde(default, rename = "reply")]
    pub replies: Vec<ReplyRule>,

    /// Voice overrides for this persona
    #[serde(default)]
    pub voice: Option<PersonaVoice>,
}

/// Per-persona voice preferences
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PersonaVoice {
    /// TTS voice identifier (e.g. "alloy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_speed: Option<f64>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Cameo".to_string(),
            tagline: "A personal voice bot. Ask me anything.".to_string(),
            system_prompt: "You are a friendly, professional personal voice bot. \
                            Answer briefly and conversationally, as if speaking aloud."
                .to_string(),
            example_questions: Vec::new(),
            replies: Vec::new(),
            voice: None,
        }
    }
}

impl Persona {
    /// Load a persona from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if the
    /// persona has no name
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Persona(format!("cannot read {}: {e}", path.display()))
        })?;

        let persona: Self = toml::from_str(&content)
            .map_err(|e| Error::Persona(format!("cannot parse {}: {e}", path.display())))?;

        if persona.name.trim().is_empty() {
            return Err(Error::Persona(format!(
                "{} has an empty persona name",
                path.display()
            )));
        }

        tracing::info!(
            persona = %persona.name,
            rules = persona.replies.len(),
            path = %path.display(),
            "loaded persona"
        );

        Ok(persona)
    }

    /// Intro line for session start
    #[must_use]
    pub fn intro(&self) -> String {
        if self.tagline.is_empty() {
            format!("Hi, I'm {}!", self.name)
        } else {
            format!("Hi, I'm {}! {}", self.name, self.tagline)
        }
    }
}
