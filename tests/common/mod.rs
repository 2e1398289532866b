//! Shared test utilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cameo::{Error, GenerativeResponder, LogEntry, ReplyRule, Result, TriggerTable};

/// Fallback double: replies with a fixed string (or a fixed error) and
/// records every invocation
pub struct ScriptedResponder {
    reply: String,
    fail_with: Option<String>,
    calls: AtomicUsize,
    utterances: Mutex<Vec<String>>,
    history_lens: Mutex<Vec<usize>>,
}

#[allow(dead_code)]
impl ScriptedResponder {
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail_with: None,
            calls: AtomicUsize::new(0),
            utterances: Mutex::new(Vec::new()),
            history_lens: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        let mut this = Self::replying("");
        this.fail_with = Some(message.to_string());
        this
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn utterances(&self) -> Vec<String> {
        self.utterances.lock().unwrap().clone()
    }

    pub fn history_lens(&self) -> Vec<usize> {
        self.history_lens.lock().unwrap().clone()
    }

    fn respond(&self, utterance: &str, history: &[LogEntry]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.utterances.lock().unwrap().push(utterance.to_string());
        self.history_lens.lock().unwrap().push(history.len());

        match &self.fail_with {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(self.reply.clone()),
        }
    }
}

#[async_trait]
impl GenerativeResponder for ScriptedResponder {
    async fn generate(&self, utterance: &str, history: &[LogEntry]) -> Result<String> {
        self.respond(utterance, history)
    }
}

// Lets a test keep a handle on the double after the session takes ownership.
// A newtype is required because the orphan rule forbids implementing the
// crate's trait directly for `Arc<_>` from this (downstream) test crate.
#[allow(dead_code)]
pub struct SharedResponder(pub Arc<ScriptedResponder>);

#[async_trait]
impl GenerativeResponder for SharedResponder {
    async fn generate(&self, utterance: &str, history: &[LogEntry]) -> Result<String> {
        self.0.respond(utterance, history)
    }
}

/// Build a trigger table from (keywords, answer) pairs
#[must_use]
pub fn table(entries: &[(&[&str], &str)]) -> TriggerTable {
    let rules: Vec<ReplyRule> = entries
        .iter()
        .map(|(keywords, answer)| ReplyRule {
            keywords: keywords.iter().map(ToString::to_string).collect(),
            answer: (*answer).to_string(),
        })
        .collect();
    TriggerTable::new(&rules)
}
