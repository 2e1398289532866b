//! Cameo - personal voice bot
//!
//! This library provides the core of a speak-and-answer bot:
//! - Reply resolution (trigger table of canned answers + generative fallback)
//! - Conversation sessions with an in-memory transcript
//! - Thin adapters for microphone, hosted STT/TTS and chat completions
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                      CLI                          │
//! │   record  │  transcript view  │  playback        │
//! └─────────────────────┬────────────────────────────┘
//!                       │
//! ┌─────────────────────▼────────────────────────────┐
//! │                 VoiceSession                      │
//! │   Transcriber  │  ResponseResolver  │ Synthesizer│
//! └─────────────────────┬────────────────────────────┘
//!                       │ (table miss only)
//! ┌─────────────────────▼────────────────────────────┐
//! │        ChatResponder (hosted chat API)            │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod resolver;
pub mod session;
pub mod setup;
pub mod voice;

pub use config::{ApiKeys, ChatConfig, Config, VoiceConfig};
pub use error::{Error, Result};
pub use llm::ChatResponder;
pub use persona::{Persona, PersonaVoice};
pub use resolver::{GenerativeResponder, ReplyRule, ResponseResolver, TriggerTable};
pub use session::{ConversationLog, LogEntry, Speaker, VoiceSession};
