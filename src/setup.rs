//! Interactive first-run setup wizard (`cameo setup`)

use dialoguer::{Confirm, Input, Select};

use crate::config::file::{
    ApiKeysFileConfig, CameoConfigFile, ChatFileConfig, VoiceFileConfig, config_file_path,
    load_config_file,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or the config file cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Cameo Setup\n");

    let existing = load_config_file();
    let config_path =
        config_file_path().ok_or_else(|| anyhow::anyhow!("could not determine config path"))?;

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Persona file
    let persona: String = Input::new()
        .with_prompt("Persona TOML file (empty for the built-in persona)")
        .default(existing.persona.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    // 2. OpenAI API key (used for STT, TTS and chat)
    let key_prompt = if existing.api_keys.openai.is_some() {
        "OpenAI API key (empty to keep the saved key)"
    } else {
        "OpenAI API key (or leave empty and set OPENAI_API_KEY)"
    };
    let entered_key: String = Input::new()
        .with_prompt(key_prompt)
        .allow_empty(true)
        .interact_text()?;
    let openai_key = if entered_key.is_empty() {
        existing.api_keys.openai.clone()
    } else {
        Some(entered_key)
    };

    // 3. Chat model for the generative fallback
    let models = ["gpt-4o-mini", "gpt-4o", "(custom)"];
    let default_model = existing
        .chat
        .model
        .as_deref()
        .and_then(|m| models.iter().position(|&l| l == m))
        .unwrap_or(0);
    let model_idx = Select::new()
        .with_prompt("Chat model for fallback answers")
        .items(&models)
        .default(default_model)
        .interact()?;
    let chat_model = if models[model_idx] == "(custom)" {
        Input::new()
            .with_prompt("Model identifier")
            .default(existing.chat.model.clone().unwrap_or_default())
            .interact_text()?
    } else {
        models[model_idx].to_string()
    };

    // 4. Voice
    let voice_enabled = Confirm::new()
        .with_prompt("Enable microphone and speech output?")
        .default(existing.voice.enabled.unwrap_or(true))
        .interact()?;

    let voices = ["alloy", "echo", "fable", "nova", "onyx", "shimmer"];
    let tts_voice = if voice_enabled {
        let default_voice = existing
            .voice
            .tts_voice
            .as_deref()
            .and_then(|v| voices.iter().position(|&l| l == v))
            .unwrap_or(0);
        let idx = Select::new()
            .with_prompt("Speaking voice")
            .items(&voices)
            .default(default_voice)
            .interact()?;
        Some(voices[idx].to_string())
    } else {
        existing.voice.tts_voice.clone()
    };

    let file = CameoConfigFile {
        persona: if persona.is_empty() {
            None
        } else {
            Some(persona)
        },
        chat: ChatFileConfig {
            model: Some(chat_model),
            api_base: existing.chat.api_base,
            max_tokens: existing.chat.max_tokens,
        },
        voice: VoiceFileConfig {
            enabled: Some(voice_enabled),
            record_secs: existing.voice.record_secs,
            stt_model: existing.voice.stt_model,
            tts_model: existing.voice.tts_model,
            tts_voice,
            tts_speed: existing.voice.tts_speed,
        },
        api_keys: ApiKeysFileConfig { openai: openai_key },
    };

    let rendered = toml::to_string_pretty(&file)?;
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&config_path, rendered)?;

    println!("\nWrote {}", config_path.display());
    println!("Run `cameo` to start talking.");

    Ok(())
}
