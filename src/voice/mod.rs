//! Voice processing module
//!
//! Thin adapters around the audio boundary: microphone capture, hosted
//! STT/TTS calls, and speaker playback. Reply resolution itself never
//! touches audio (see `resolver.rs`).

mod capture;
mod playback;
mod stt;
mod tts;

pub use capture::{Microphone, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioOutput;
pub use stt::Transcriber;
pub use tts::Synthesizer;
