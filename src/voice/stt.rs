//! Speech-to-text adapter
//!
//! Uploads WAV audio to an OpenAI-compatible `/audio/transcriptions`
//! endpoint and returns the transcript text.

use crate::{Error, Result};

/// Response body from the transcription endpoint
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes recorded speech to text
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl Transcriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, api_base: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for transcription".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Transcribe WAV audio bytes to text
    ///
    /// # Errors
    ///
    /// Returns error if the upload or the API call fails
    pub async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = wav.len(), model = %self.model, "transcribing");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav.to_vec())
                    .file_name("utterance.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Transcribe(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transcribe(format!("transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Transcribe(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcribe(format!("malformed transcription response: {e}")))?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        let result = Transcriber::new(
            String::new(),
            "https://api.openai.com/v1".to_string(),
            "whisper-1".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let t = Transcriber::new(
            "key".to_string(),
            "https://api.openai.com/v1/".to_string(),
            "whisper-1".to_string(),
        )
        .unwrap();
        assert_eq!(t.api_base, "https://api.openai.com/v1");
    }
}
