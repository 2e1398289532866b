//! Session and transcript integration tests

use cameo::{ResponseResolver, Speaker, VoiceSession};

mod common;
use common::{ScriptedResponder, SharedResponder, table};

fn session_with(fallback: ScriptedResponder) -> VoiceSession {
    let resolver = ResponseResolver::new(table(&[(&["superpower"], "Canned answer.")]));
    VoiceSession::new(resolver, Box::new(fallback))
}

#[tokio::test]
async fn turn_appends_both_sides_in_order() {
    let mut session = session_with(ScriptedResponder::replying("Generated answer."));

    session.take_turn("what's your superpower?").await.unwrap();
    session.take_turn("and your weekend plans?").await.unwrap();

    let entries = session.log().entries();
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].speaker, Speaker::User);
    assert_eq!(entries[0].text, "what's your superpower?");
    assert_eq!(entries[1].speaker, Speaker::Bot);
    assert_eq!(entries[1].text, "Canned answer.");
    assert_eq!(entries[2].text, "and your weekend plans?");
    assert_eq!(entries[3].text, "Generated answer.");
}

#[tokio::test]
async fn fallback_sees_history_before_current_turn() {
    let resolver = ResponseResolver::new(table(&[]));
    let fallback = std::sync::Arc::new(ScriptedResponder::replying("reply"));
    let mut session =
        VoiceSession::new(resolver, Box::new(SharedResponder(std::sync::Arc::clone(&fallback))));

    session.take_turn("first").await.unwrap();
    session.take_turn("second").await.unwrap();
    session.take_turn("third").await.unwrap();

    assert_eq!(fallback.history_lens(), [0, 2, 4]);
    assert_eq!(fallback.utterances(), ["first", "second", "third"]);
}

#[tokio::test]
async fn failed_turn_leaves_log_unchanged() {
    let mut session = session_with(ScriptedResponder::failing("connection reset"));

    session.take_turn("what's your superpower?").await.unwrap();
    assert_eq!(session.log().len(), 2);

    let err = session.take_turn("something unmatched").await.unwrap_err();
    assert!(err.to_string().contains("connection reset"));

    // The failed exchange was not recorded
    assert_eq!(session.log().len(), 2);
    assert_eq!(session.log().last().unwrap().text, "Canned answer.");
}

#[tokio::test]
async fn sessions_get_distinct_ids() {
    let a = session_with(ScriptedResponder::replying("x"));
    let b = session_with(ScriptedResponder::replying("x"));

    assert_ne!(a.id(), b.id());
    assert!(!a.id().is_empty());
}
