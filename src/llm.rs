//! Generative fallback backed by an OpenAI-compatible chat-completion API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::resolver::GenerativeResponder;
use crate::session::LogEntry;
use crate::{Error, Result};

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completion client used as the generative fallback
///
/// Speaks the OpenAI `/chat/completions` shape; `api_base` makes it usable
/// against any compatible endpoint. Every failure mode maps to
/// [`Error::Upstream`] so callers see one taxonomy at this boundary.
pub struct ChatResponder {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    system_prompt: String,
    max_tokens: Option<u32>,
}

impl ChatResponder {
    /// Create a new chat responder
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        system_prompt: String,
        max_tokens: Option<u32>,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for chat completions".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            system_prompt,
            max_tokens,
        })
    }
}

/// Assemble the message list: system prompt, replayed history, then the
/// current utterance
fn build_messages(system_prompt: &str, history: &[LogEntry], utterance: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if !system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        });
    }

    for entry in history {
        messages.push(ChatMessage {
            role: entry.speaker.as_role().to_string(),
            content: entry.text.clone(),
        });
    }

    messages.push(ChatMessage {
        role: "user".to_string(),
        content: utterance.to_string(),
    });

    messages
}

#[async_trait]
impl GenerativeResponder for ChatResponder {
    async fn generate(&self, utterance: &str, history: &[LogEntry]) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(&self.system_prompt, history, utterance),
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            history_len = history.len(),
            "requesting chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            return Err(Error::Upstream(format!("chat API error {status}: {body}")));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed chat response: {e}")))?;

        let reply = result
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| Error::Upstream("chat response contained no text".to_string()))?;

        tracing::info!(chars = reply.len(), "chat completion received");
        Ok(reply)
    }
}
