//! Conversation sessions
//!
//! A session owns the in-memory transcript for one run of the bot and drives
//! one resolution turn at a time. Nothing here is persisted; the log lives
//! from session start to session end.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Result;
use crate::resolver::{GenerativeResponder, ResponseResolver};

/// Who said a line in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Chat-completion role string for this speaker
    #[must_use]
    pub const fn as_role(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "assistant",
        }
    }
}

/// One line of the conversation
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Insertion-ordered transcript for one session
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<LogEntry>,
}

impl ConversationLog {
    /// Create an empty log
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a line to the log
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push(LogEntry {
            speaker,
            text: text.into(),
            at: Utc::now(),
        });
    }

    /// All lines, oldest first
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent line, if any
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

/// Per-session turn runner
///
/// Wires the resolver to its generative fallback and accumulates the
/// transcript. Each session carries its own log; the resolver itself holds
/// no state across turns.
pub struct VoiceSession {
    id: String,
    resolver: ResponseResolver,
    fallback: Box<dyn GenerativeResponder>,
    log: ConversationLog,
}

impl VoiceSession {
    /// Start a new session
    #[must_use]
    pub fn new(resolver: ResponseResolver, fallback: Box<dyn GenerativeResponder>) -> Self {
        let id = Uuid::new_v4().to_string();
        tracing::info!(session = %id, rules = resolver.table().len(), "session started");

        Self {
            id,
            resolver,
            fallback,
            log: ConversationLog::new(),
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The transcript accumulated so far
    #[must_use]
    pub const fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Run one turn: resolve the utterance and record both sides
    ///
    /// The fallback receives the log as it stood before this turn; the
    /// current utterance rides alongside as its own argument. A failed turn
    /// leaves the log unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] if the fallback fails.
    pub async fn take_turn(&mut self, utterance: &str) -> Result<String> {
        let reply = self
            .resolver
            .resolve(utterance, self.log.entries(), self.fallback.as_ref())
            .await?;

        self.log.push(Speaker::User, utterance);
        self.log.push(Speaker::Bot, reply.clone());

        tracing::debug!(session = %self.id, turns = self.log.len() / 2, "turn complete");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.push(Speaker::User, "hello");
        log.push(Speaker::Bot, "hi there");
        log.push(Speaker::User, "bye");

        let texts: Vec<_> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["hello", "hi there", "bye"]);
        assert_eq!(log.last().unwrap().speaker, Speaker::User);
    }

    #[test]
    fn test_speaker_roles() {
        assert_eq!(Speaker::User.as_role(), "user");
        assert_eq!(Speaker::Bot.as_role(), "assistant");
    }
}
