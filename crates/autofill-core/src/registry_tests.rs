use super::*;
use std::sync::{Arc, Mutex as StdMutex};

use autofill_protocols::{MessageType, NO_ACTION_JSON, NO_INPUT_TYPES_JSON, PROVIDER_LOCKED_JSON};

type Calls = Arc<StdMutex<Vec<Option<String>>>>;

/// Returns a call log and a callback that appends to it.
fn recorder() -> (Calls, impl FnOnce(Option<String>) + Send + 'static) {
    let calls: Calls = Arc::new(StdMutex::new(Vec::new()));
    let sink = calls.clone();
    (calls, move |response| sink.lock().unwrap().push(response))
}

fn calls_of(calls: &Calls) -> Vec<Option<String>> {
    calls.lock().unwrap().clone()
}

fn no_action() -> Option<String> {
    Some(NO_ACTION_JSON.to_string())
}

#[test]
fn test_send_resolves_registered_callback() {
    let registry = ReplyRegistry::new();
    let (calls, cb) = recorder();

    registry.register("msg", cb);
    assert!(registry.send("msg", Some("hello".to_string())));

    assert_eq!(calls_of(&calls), vec![Some("hello".to_string())]);
    assert!(registry.is_empty());
}

#[test]
fn test_second_send_is_noop() {
    let registry = ReplyRegistry::new();
    let (calls, cb) = recorder();

    registry.register("msg", cb);
    assert!(registry.send("msg", Some("first".to_string())));
    assert!(!registry.send("msg", Some("second".to_string())));

    assert_eq!(calls_of(&calls), vec![Some("first".to_string())]);
}

#[test]
fn test_send_without_register_is_safe() {
    let registry: ReplyRegistry<&str> = ReplyRegistry::new();
    assert!(!registry.send("unknown-key", Some("x".to_string())));
    assert!(registry.is_empty());
    assert_eq!(registry.stats().missed, 1);
}

#[test]
fn test_send_none_payload() {
    let registry = ReplyRegistry::new();
    let (calls, cb) = recorder();

    registry.register("msg", cb);
    registry.send("msg", None);

    assert_eq!(calls_of(&calls), vec![None]);
}

#[test]
fn test_register_supersedes_previous() {
    let registry = ReplyRegistry::new();
    let (first, cb1) = recorder();
    let (second, cb2) = recorder();

    registry.register("dup", cb1);
    registry.register("dup", cb2);

    assert_eq!(calls_of(&first), vec![no_action()]);
    assert!(calls_of(&second).is_empty());
    assert!(registry.is_pending("dup"));
    assert_eq!(registry.len(), 1);

    registry.send("dup", Some("answer".to_string()));
    assert_eq!(calls_of(&first), vec![no_action()]);
    assert_eq!(calls_of(&second), vec![Some("answer".to_string())]);
}

#[test]
fn test_each_register_resolves_only_its_predecessor() {
    let registry = ReplyRegistry::new();
    let mut logs = Vec::new();

    for i in 0..5 {
        let (calls, cb) = recorder();
        registry.register("focus", cb);
        logs.push(calls);

        // Everything before the newest has been told "no action" exactly once.
        for (j, log) in logs.iter().enumerate() {
            if j < i {
                assert_eq!(calls_of(log), vec![no_action()]);
            } else {
                assert!(calls_of(log).is_empty());
            }
        }
    }
    assert_eq!(registry.stats().superseded, 4);
}

#[test]
fn test_cancel_all_resolves_every_key() {
    let registry = ReplyRegistry::new();
    let (a, cb_a) = recorder();
    let (b, cb_b) = recorder();

    registry.register("a", cb_a);
    registry.register("b", cb_b);
    assert_eq!(registry.cancel_all(), 2);

    assert_eq!(calls_of(&a), vec![no_action()]);
    assert_eq!(calls_of(&b), vec![no_action()]);
    assert!(registry.is_empty());

    assert!(!registry.send("a", Some("late".to_string())));
    assert_eq!(calls_of(&a), vec![no_action()]);
}

#[test]
fn test_cancel_all_on_empty_registry() {
    let registry: ReplyRegistry<&str> = ReplyRegistry::new();
    assert_eq!(registry.cancel_all(), 0);
}

#[test]
fn test_cancel_one_key() {
    let registry = ReplyRegistry::new();
    let (a, cb_a) = recorder();
    let (b, cb_b) = recorder();

    registry.register("a", cb_a);
    registry.register("b", cb_b);

    assert!(registry.cancel("a"));
    assert!(!registry.cancel("a"));

    assert_eq!(calls_of(&a), vec![no_action()]);
    assert!(calls_of(&b).is_empty());
    assert!(registry.is_pending("b"));
}

#[test]
fn test_keys_are_independent() {
    let registry = ReplyRegistry::new();
    let (a, cb_a) = recorder();
    let (b, cb_b) = recorder();
    let (a2, cb_a2) = recorder();

    registry.register("a", cb_a);
    registry.register("b", cb_b);
    registry.register("a", cb_a2);
    registry.send("a", Some("for-a".to_string()));

    assert_eq!(calls_of(&a), vec![no_action()]);
    assert_eq!(calls_of(&a2), vec![Some("for-a".to_string())]);
    assert!(calls_of(&b).is_empty());
    assert!(registry.is_pending("b"));
}

#[test]
fn test_key_reusable_after_resolution() {
    let registry = ReplyRegistry::new();

    let (first, cb) = recorder();
    registry.register("msg", cb);
    registry.send("msg", Some("one".to_string()));

    let (second, cb) = recorder();
    registry.register("msg", cb);
    assert_eq!(calls_of(&first), vec![Some("one".to_string())]);
    assert!(calls_of(&second).is_empty());

    registry.cancel_all();
    let (third, cb) = recorder();
    registry.register("msg", cb);
    registry.send("msg", Some("three".to_string()));

    assert_eq!(calls_of(&second), vec![no_action()]);
    assert_eq!(calls_of(&third), vec![Some("three".to_string())]);
}

#[test]
fn test_callback_may_reenter_registry() {
    let registry = Arc::new(ReplyRegistry::new());
    let (inner, inner_cb) = recorder();

    let handle = registry.clone();
    registry.register("msg", move |_response| {
        handle.register("msg", inner_cb);
    });

    registry.send("msg", Some("outer".to_string()));
    assert!(registry.is_pending("msg"));

    registry.send("msg", Some("inner".to_string()));
    assert_eq!(calls_of(&inner), vec![Some("inner".to_string())]);
}

#[test]
fn test_superseded_callback_runs_after_replacement_is_pending() {
    let registry = Arc::new(ReplyRegistry::new());
    let seen: Arc<StdMutex<Option<(bool, usize)>>> = Arc::new(StdMutex::new(None));

    let handle = registry.clone();
    let observed = seen.clone();
    registry.register("focus", move |_response| {
        *observed.lock().unwrap() = Some((handle.is_pending("focus"), handle.len()));
    });
    let (second, cb) = recorder();
    registry.register("focus", cb);

    assert_eq!(*seen.lock().unwrap(), Some((true, 1)));
    assert!(calls_of(&second).is_empty());
    registry.cancel_all();
}

#[test]
fn test_payload_follows_key_on_every_resolution_path() {
    let expected = |message_type: MessageType| Some(message_type.no_action_json().to_string());

    let registry = ReplyRegistry::new();
    let (superseded, cb) = recorder();
    registry.register(MessageType::GetAvailableInputTypes, cb);
    registry.register(MessageType::GetAvailableInputTypes, |_| {});
    assert_eq!(calls_of(&superseded), vec![Some(NO_INPUT_TYPES_JSON.to_string())]);

    let (cancelled, cb) = recorder();
    registry.register(MessageType::AskToUnlockProvider, cb);
    registry.cancel(&MessageType::AskToUnlockProvider);
    assert_eq!(calls_of(&cancelled), vec![Some(PROVIDER_LOCKED_JSON.to_string())]);

    let mut logs = Vec::new();
    for message_type in MessageType::ALL {
        let (calls, cb) = recorder();
        registry.register(message_type, cb);
        logs.push((message_type, calls));
    }
    registry.cancel_all();
    for (message_type, calls) in &logs {
        assert_eq!(calls_of(calls), vec![expected(*message_type)]);
    }

    let (dropped, cb) = recorder();
    registry.register(MessageType::AskToUnlockProvider, cb);
    drop(registry);
    assert_eq!(calls_of(&dropped), vec![expected(MessageType::AskToUnlockProvider)]);
}

#[test]
fn test_drop_resolves_pending() {
    let (calls, cb) = recorder();
    {
        let registry = ReplyRegistry::new();
        registry.register("msg", cb);
    }
    assert_eq!(calls_of(&calls), vec![no_action()]);
}

#[test]
fn test_custom_policy_payload() {
    let registry = ReplyRegistry::with_policy(CancellationPolicy::with_payload("stale"));
    let (calls, cb) = recorder();

    registry.register("msg", cb);
    registry.cancel_all();

    assert_eq!(calls_of(&calls), vec![Some("stale".to_string())]);
}

#[test]
fn test_owned_keys_borrowed_lookup() {
    let registry: ReplyRegistry<String> = ReplyRegistry::new();
    let (calls, cb) = recorder();

    registry.register("getAutofillDataFocus".to_string(), cb);
    assert!(registry.is_pending("getAutofillDataFocus"));
    registry.send("getAutofillDataFocus", Some("ok".to_string()));

    assert_eq!(calls_of(&calls), vec![Some("ok".to_string())]);
}

#[test]
fn test_pending_keys() {
    let registry = ReplyRegistry::new();
    registry.register("a", |_| {});
    registry.register("b", |_| {});

    let mut keys = registry.pending_keys();
    keys.sort();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_stats_track_transitions() {
    let registry = ReplyRegistry::new();
    registry.register("a", |_| {});
    registry.register("a", |_| {});
    registry.send("a", Some("x".to_string()));
    registry.send("a", Some("y".to_string()));
    registry.register("b", |_| {});
    registry.register("c", |_| {});
    registry.cancel_all();

    let stats = registry.stats();
    assert_eq!(stats.registered, 4);
    assert_eq!(stats.superseded, 1);
    assert_eq!(stats.answered, 1);
    assert_eq!(stats.missed, 1);
    assert_eq!(stats.cancelled, 2);
    assert_eq!(stats.outstanding(), 0);
}

#[test]
fn test_debug_shows_pending_count() {
    let registry = ReplyRegistry::new();
    registry.register("a", |_| {});
    let debug = format!("{:?}", registry);
    assert!(debug.contains("ReplyRegistry"));
    assert!(debug.contains("pending: 1"));
}
