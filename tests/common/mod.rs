#![allow(dead_code)]

use serde_json::{json, Value};
use sigfold::{Action, BoxError, Signal, Source};
use std::cell::RefCell;
use std::rc::Rc;

pub fn tick() -> Value {
    json!({"type": "tick"})
}

pub fn counter_mutator(state: u64, _action: &Action) -> Result<u64, BoxError> {
    Ok(state + 1)
}

pub fn emit_n(signal: &Signal<u64>, n: usize) {
    for _ in 0..n {
        signal.emit(tick()).unwrap();
    }
}

/// Shared recorder for states (or errors) seen by observers.
#[derive(Clone)]
pub struct Recorder<T> {
    seen: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Self {
        Recorder {
            seen: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A handler that pushes every value it sees into this recorder.
    pub fn handler(&self) -> impl Fn(&T) + 'static {
        let seen = Rc::clone(&self.seen);
        move |value: &T| seen.borrow_mut().push(value.clone())
    }

    pub fn seen(&self) -> Vec<T> {
        self.seen.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }
}

/// Minimal mountable source: retains the sink and replays pushed payloads.
pub struct MemorySource {
    sink: Option<Box<dyn FnMut(Value)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource { sink: None }
    }

    pub fn push(&mut self, payload: Value) {
        if let Some(sink) = &mut self.sink {
            sink(payload);
        }
    }
}

impl Source for MemorySource {
    type Handle = &'static str;

    fn observe(&mut self, sink: Box<dyn FnMut(Value)>) -> Self::Handle {
        self.sink = Some(sink);
        "mounted"
    }
}
