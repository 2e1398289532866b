//! Canned-reply resolution
//!
//! Turns one transcribed utterance into a reply: an ordered trigger table of
//! keyword rules is scanned first, and only on a miss is the generative
//! fallback invoked. First matching rule wins; table authors order rules
//! from most specific to most general.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::session::LogEntry;

/// One reply rule: trigger keywords and the canned answer they select
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplyRule {
    /// Keywords matched as case-insensitive substrings of the utterance
    pub keywords: Vec<String>,
    /// Canned answer returned verbatim when any keyword matches
    pub answer: String,
}

/// A compiled rule with keywords folded to lowercase
#[derive(Debug, Clone)]
struct CompiledRule {
    keywords: Vec<String>,
    answer: String,
}

impl CompiledRule {
    /// Check whether any keyword is contained in the folded utterance
    fn matches(&self, folded: &str) -> bool {
        self.keywords.iter().any(|k| folded.contains(k.as_str()))
    }
}

/// Ordered table of reply rules
///
/// Built once from persona configuration and immutable afterwards. The table
/// performs no specificity analysis: two rules with overlapping keywords
/// resolve to whichever comes first.
#[derive(Debug, Clone, Default)]
pub struct TriggerTable {
    rules: Vec<CompiledRule>,
}

impl TriggerTable {
    /// Build a table from configured rules
    ///
    /// Keywords are folded to lowercase. Rules whose keyword set is empty
    /// after folding can never match and are logged and skipped.
    #[must_use]
    pub fn new(rules: &[ReplyRule]) -> Self {
        let compiled: Vec<_> = rules
            .iter()
            .filter_map(|rule| {
                let keywords: Vec<String> = rule
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();

                if keywords.is_empty() {
                    tracing::warn!(
                        answer = %rule.answer,
                        "reply rule has no usable keywords, skipping"
                    );
                    return None;
                }

                Some(CompiledRule {
                    keywords,
                    answer: rule.answer.clone(),
                })
            })
            .collect();

        tracing::info!(count = compiled.len(), "loaded reply rules");

        Self { rules: compiled }
    }

    /// Number of rules in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the canned answer for an utterance, if any rule matches
    ///
    /// The utterance is folded to lowercase; that is the only normalization.
    /// Returns the first matching rule's answer.
    #[must_use]
    pub fn find(&self, utterance: &str) -> Option<&str> {
        let folded = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&folded))
            .map(|rule| rule.answer.as_str())
    }
}

/// Generative fallback invoked when no trigger rule matches
///
/// Backed in practice by a hosted chat-completion API; the resolver treats
/// it as opaque. `history` is the conversation so far, oldest first, and may
/// be empty. Failures surface as [`crate::Error::Upstream`].
#[async_trait]
pub trait GenerativeResponder: Send + Sync {
    /// Generate a reply to `utterance`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] on network, auth, rate-limit or
    /// malformed-response failures.
    async fn generate(&self, utterance: &str, history: &[LogEntry]) -> Result<String>;
}

/// Resolves one utterance to a reply
///
/// Stateless per call: holds only the immutable trigger table, so a shared
/// instance can serve concurrent sessions without coordination.
#[derive(Debug, Clone, Default)]
pub struct ResponseResolver {
    table: TriggerTable,
}

impl ResponseResolver {
    /// Create a resolver over a trigger table
    #[must_use]
    pub const fn new(table: TriggerTable) -> Self {
        Self { table }
    }

    /// The trigger table this resolver scans
    #[must_use]
    pub const fn table(&self) -> &TriggerTable {
        &self.table
    }

    /// Resolve an utterance to a reply
    ///
    /// Returns the first matching rule's canned answer without touching the
    /// fallback. On a miss the fallback is invoked exactly once with the
    /// original, unfolded utterance and its output is returned verbatim. No
    /// caching, no retry, no local timeout; callers wanting cancellation
    /// race this future against their own timer.
    ///
    /// # Errors
    ///
    /// Only fallback failures ([`crate::Error::Upstream`]) can surface, and
    /// they are propagated unchanged.
    pub async fn resolve(
        &self,
        utterance: &str,
        history: &[LogEntry],
        fallback: &dyn GenerativeResponder,
    ) -> Result<String> {
        if let Some(answer) = self.table.find(utterance) {
            tracing::debug!(utterance, "trigger rule matched");
            return Ok(answer.to_string());
        }

        tracing::debug!(utterance, "no trigger rule matched, using fallback");
        fallback.generate(utterance, history).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Error;

    /// Fallback that records invocations and returns a fixed reply
    struct Scripted {
        reply: String,
        calls: AtomicUsize,
        last_utterance: Mutex<Option<String>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_utterance: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl GenerativeResponder for Scripted {
        async fn generate(&self, utterance: &str, _history: &[LogEntry]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_utterance.lock().unwrap() = Some(utterance.to_string());
            Ok(self.reply.clone())
        }
    }

    /// Fallback that always fails
    struct Failing;

    #[async_trait]
    impl GenerativeResponder for Failing {
        async fn generate(&self, _utterance: &str, _history: &[LogEntry]) -> Result<String> {
            Err(Error::Upstream("quota exceeded".to_string()))
        }
    }

    fn rule(keywords: &[&str], answer: &str) -> ReplyRule {
        ReplyRule {
            keywords: keywords.iter().map(ToString::to_string).collect(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_canned_answer_skips_fallback() {
        let table = TriggerTable::new(&[rule(&["superpower"], "Shipping on time.")]);
        let resolver = ResponseResolver::new(table);
        let fallback = Scripted::new("generated");

        let reply = tokio_test::block_on(resolver.resolve(
            "what is your superpower?",
            &[],
            &fallback,
        ))
        .unwrap();

        assert_eq!(reply, "Shipping on time.");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_miss_invokes_fallback_once_with_original_text() {
        let table = TriggerTable::new(&[rule(&["superpower"], "A")]);
        let resolver = ResponseResolver::new(table);
        let fallback = Scripted::new("generated");

        let reply = tokio_test::block_on(resolver.resolve(
            "Tell Me A JOKE",
            &[],
            &fallback,
        ))
        .unwrap();

        assert_eq!(reply, "generated");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
        // Fallback sees the utterance as spoken, not the folded form
        assert_eq!(
            fallback.last_utterance.lock().unwrap().as_deref(),
            Some("Tell Me A JOKE")
        );
    }

    #[test]
    fn test_first_match_wins_over_later_more_specific_rule() {
        let table = TriggerTable::new(&[
            rule(&["life"], "A"),
            rule(&["life story"], "B"),
        ]);
        let resolver = ResponseResolver::new(table);
        let fallback = Scripted::new("generated");

        let reply = tokio_test::block_on(resolver.resolve(
            "tell me about your life story",
            &[],
            &fallback,
        ))
        .unwrap();

        assert_eq!(reply, "A");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let table = TriggerTable::new(&[rule(&["superpower"], "A")]);

        for utterance in ["SUPERPOWER", "SuperPower", "superpower"] {
            assert_eq!(table.find(utterance), Some("A"));
        }
    }

    #[test]
    fn test_empty_table_always_falls_through() {
        let resolver = ResponseResolver::new(TriggerTable::new(&[]));
        let fallback = Scripted::new("generated");

        let reply =
            tokio_test::block_on(resolver.resolve("anything", &[], &fallback)).unwrap();

        assert_eq!(reply, "generated");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_upstream_error_propagates_unchanged() {
        let resolver = ResponseResolver::new(TriggerTable::new(&[rule(&["hi"], "A")]));

        let err = tokio_test::block_on(resolver.resolve(
            "something unmatched",
            &[],
            &Failing,
        ))
        .unwrap_err();

        assert!(matches!(err, Error::Upstream(_)));
        assert_eq!(err.to_string(), "upstream error: quota exceeded");
    }

    #[test]
    fn test_rule_without_keywords_is_dropped() {
        let table = TriggerTable::new(&[
            rule(&[], "never"),
            rule(&["", ""], "never either"),
            rule(&["ok"], "A"),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.find("ok then"), Some("A"));
    }

    #[test]
    fn test_keyword_matches_anywhere_as_substring() {
        let table = TriggerTable::new(&[rule(&["grow"], "A")]);

        // Substring containment, no word boundaries
        assert_eq!(table.find("how are you growing lately"), Some("A"));
        assert_eq!(table.find("grow"), Some("A"));
        assert_eq!(table.find("g r o w"), None);
    }
}
