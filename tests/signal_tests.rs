mod common;

use common::{counter_mutator, tick, Recorder};
use serde_json::json;
use sigfold::{Signal, SignalError};

#[test]
fn test_register_returns_dispose_handle() {
    let signal: Signal<u64> = Signal::new(0);
    let mut registration = signal.register(counter_mutator);

    assert_eq!(signal.mutator_count(), 1);
    assert!(registration.dispose());
    assert_eq!(signal.mutator_count(), 0);
}

#[test]
fn test_dispose_handle_is_idempotent() {
    let signal: Signal<u64> = Signal::new(0);
    let mut registration = signal.register(counter_mutator);

    assert!(registration.dispose());
    assert!(!registration.dispose());
    assert_eq!(signal.mutator_count(), 0);
}

#[test]
fn test_dispose_handle_removes_only_its_own_key() {
    let signal: Signal<u64> = Signal::new(0);
    let mut first = signal.register(counter_mutator);
    let _second = signal.register_as("keep", counter_mutator).unwrap();

    assert!(first.dispose());
    assert_eq!(signal.mutator_count(), 1);

    // the survivor still runs
    signal.emit(tick()).unwrap();
    signal.drain();
    assert_eq!(signal.current(), 1);
}

#[test]
fn test_dispose_by_key() {
    let signal: Signal<u64> = Signal::new(0);
    signal.register_as("mut", counter_mutator).unwrap();

    assert_eq!(signal.mutator_count(), 1);
    assert!(signal.dispose("mut"));
    assert_eq!(signal.mutator_count(), 0);
}

#[test]
fn test_dispose_absent_key_is_noop() {
    let signal: Signal<u64> = Signal::new(0);
    assert!(!signal.dispose("ghost"));
}

#[test]
fn test_duplicate_key_is_rejected() {
    let signal: Signal<u64> = Signal::new(0);
    signal.register_as("mut", counter_mutator).unwrap();

    let err = signal.register_as("mut", counter_mutator).unwrap_err();
    assert!(matches!(err, SignalError::DuplicateKey(key) if key == "mut"));
    assert_eq!(signal.mutator_count(), 1);

    // disposing frees the key for reuse
    assert!(signal.dispose("mut"));
    signal.register_as("mut", counter_mutator).unwrap();
}

#[test]
fn test_dispose_all() {
    let signal: Signal<u64> = Signal::new(0);
    signal.register(counter_mutator);
    signal.register(counter_mutator);

    assert_eq!(signal.dispose_all(), Ok(()));
    assert_eq!(signal.mutator_count(), 0);
}

#[test]
fn test_dispose_all_on_empty_registry() {
    let signal: Signal<u64> = Signal::new(0);
    assert_eq!(signal.dispose_all(), Ok(()));
}

#[test]
fn test_default_construction_uses_the_empty_state() {
    let signal: Signal<u64> = Signal::default();
    assert_eq!(signal.current(), 0);

    let signal: Signal<serde_json::Map<String, serde_json::Value>> = Signal::default();
    assert!(signal.current().is_empty());
}

#[test]
fn test_initial_state_is_readable_before_any_emit() {
    let signal = Signal::new(json!({"foo": "bar"}));
    let recorder: Recorder<serde_json::Value> = Recorder::new();
    signal.observe(recorder.handler()).unwrap();

    // no replayed event — observers read the accessor
    assert_eq!(recorder.len(), 0);
    assert_eq!(signal.current(), json!({"foo": "bar"}));
}

#[test]
fn test_emit_rejects_non_object_payloads() {
    let signal: Signal<u64> = Signal::new(0);
    let recorder: Recorder<u64> = Recorder::new();
    signal.observe(recorder.handler()).unwrap();

    let err = signal.emit(json!("action string")).unwrap_err();
    assert!(matches!(err, SignalError::InvalidPayload { kind: "a string" }));
    assert!(signal.emit(json!(42)).is_err());
    assert!(signal.emit(json!(["a"])).is_err());
    assert!(signal.emit(serde_json::Value::Null).is_err());

    // nothing was scheduled
    assert_eq!(signal.pending(), 0);
    signal.drain();
    assert_eq!(recorder.len(), 0);
}

#[test]
fn test_emit_defers_dispatch() {
    let signal: Signal<u64> = Signal::new(0);
    signal.register(counter_mutator);

    signal.emit(tick()).unwrap();
    assert_eq!(signal.current(), 0);
    assert_eq!(signal.pending(), 1);

    assert_eq!(signal.drain(), 1);
    assert_eq!(signal.current(), 1);
    assert_eq!(signal.pending(), 0);
}

#[test]
fn test_cloned_handles_share_one_store() {
    let signal: Signal<u64> = Signal::new(0);
    let other = signal.clone();
    other.register(counter_mutator);

    signal.emit(tick()).unwrap();
    other.drain();
    assert_eq!(signal.current(), 1);
}
