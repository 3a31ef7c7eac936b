use crate::action::Action;
use crate::error::{BoxError, SignalError};
use crate::observer::{Observer, ObserverEntry};
use crate::registry::{fold_entries, Registry};
use log::{debug, trace, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// A registered state-transition function.
///
/// Mutators receive owned state plus the triggering action and return the
/// next state. They should be pure (no I/O, no shared mutation across
/// actions) and fail by returning `Err` — the store aborts the fold at the
/// first error and routes it to observers' error handlers.
pub type MutatorFn<S> = Rc<dyn Fn(S, &Action) -> Result<S, BoxError>>;

struct Inner<S> {
    state: S,
    queue: VecDeque<Action>,
    mutators: Registry<MutatorFn<S>>,
    observers: Registry<ObserverEntry<S>>,
}

/// An event-sourced reactive state container.
///
/// Actions submitted via [`emit`](Signal::emit) are queued and, on the next
/// [`drain`](Signal::drain), folded through every registered mutator in
/// registration order to produce the next state, which is then multicast to
/// every registered observer in registration order.
///
/// The store is single-threaded and cooperative: nothing runs inside `emit`,
/// and a dispatch cycle runs to completion without interleaving with
/// registrations or removals. Handles are cheap to clone and share one store.
///
/// # Examples
///
/// ```
/// use sigfold::Signal;
/// use serde_json::json;
///
/// let signal: Signal<u64> = Signal::new(0);
/// signal.register(|state, _action| Ok(state + 1));
///
/// signal.emit(json!({"type": "tick"})).unwrap();
/// assert_eq!(signal.current(), 0); // deferred — nothing ran inside emit
///
/// signal.drain();
/// assert_eq!(signal.current(), 1);
/// ```
pub struct Signal<S> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S> Clone for Signal<S> {
    fn clone(&self) -> Self {
        Signal {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Default + Clone + 'static> Default for Signal<S> {
    fn default() -> Self {
        Signal::new(S::default())
    }
}

impl<S: Clone + 'static> Signal<S> {
    /// Create a store holding the given initial state.
    ///
    /// With `S: Default`, `Signal::default()` gives the conventional
    /// empty-state construction.
    pub fn new(initial: S) -> Self {
        Signal {
            inner: Rc::new(RefCell::new(Inner {
                state: initial,
                queue: VecDeque::new(),
                mutators: Registry::new(),
                observers: Registry::new(),
            })),
        }
    }

    /// The current state.
    ///
    /// Observers registered before any action was emitted read the initial
    /// state here — there is no replayed initial event.
    pub fn current(&self) -> S {
        self.inner.borrow().state.clone()
    }

    /// Submit an action for asynchronous dispatch.
    ///
    /// The payload must be a JSON object. Validation happens synchronously;
    /// a rejected payload is never queued and no observer ever sees it.
    /// Accepted actions dispatch on the next [`drain`](Signal::drain), in
    /// emission order. Fire-and-forget: fold results (state or error) are
    /// only observable through registered observers.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidPayload`] for non-object payloads.
    pub fn emit(&self, payload: Value) -> Result<(), SignalError> {
        let action = Action::new(payload)?;
        self.emit_action(action);
        Ok(())
    }

    /// Queue an already-validated action.
    pub fn emit_action(&self, action: Action) {
        trace!(
            "sigfold: queued action type={}",
            action.action_type().unwrap_or("<none>")
        );
        self.inner.borrow_mut().queue.push_back(action);
    }

    /// Number of actions queued and not yet dispatched.
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Run the dispatch loop until the queue is empty.
    ///
    /// Each queued action is folded through the mutators and the result
    /// multicast to the observers, strictly in emission order. Actions
    /// emitted re-entrantly from a mutator or observer callback land at the
    /// back of the queue and are processed in the same call, after everything
    /// already queued. Returns the number of actions dispatched.
    pub fn drain(&self) -> usize {
        let mut processed = 0;
        loop {
            let action = self.inner.borrow_mut().queue.pop_front();
            let Some(action) = action else { break };
            self.dispatch(&action);
            processed += 1;
        }
        if processed > 0 {
            debug!("sigfold: drained {processed} action(s)");
        }
        processed
    }

    /// Fold one action and notify observers.
    ///
    /// Registries are snapshotted up front, so handlers registered or removed
    /// by a callback take effect on the next cycle and never perturb this
    /// one. No borrow is held while user callbacks run — re-entrant calls
    /// back into the store are safe.
    fn dispatch(&self, action: &Action) {
        let (mutators, observers, state) = {
            let inner = self.inner.borrow();
            (
                inner.mutators.snapshot(),
                inner.observers.snapshot(),
                inner.state.clone(),
            )
        };

        let folded = fold_entries(&mutators, state, |state, key, mutator| {
            mutator(state, action).map_err(|source| SignalError::MutatorFold {
                key: key.to_string(),
                source,
            })
        });

        match folded {
            Ok(next) => {
                // Commit before notifying so current() agrees with the value
                // observers receive.
                self.inner.borrow_mut().state = next.clone();
                for (_, observer) in &observers {
                    (observer.next)(&next);
                }
            }
            Err(err) => {
                warn!("sigfold: {err}");
                for (_, observer) in &observers {
                    if let Some(error) = &observer.error {
                        error(&err);
                    }
                }
            }
        }
    }

    /// Register a mutator under a generated key.
    ///
    /// Returns a [`Registration`] that removes exactly this mutator when
    /// disposed. Dropping the handle does not dispose — the mutator stays
    /// registered and can still be removed via [`dispose`](Signal::dispose).
    pub fn register(
        &self,
        mutator: impl Fn(S, &Action) -> Result<S, BoxError> + 'static,
    ) -> Registration<S> {
        let key = self.inner.borrow_mut().mutators.insert_anon(Rc::new(mutator));
        self.registration(key, Slot::Mutator)
    }

    /// Register a mutator under a caller-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::DuplicateKey`] if the key is live; the existing
    /// mutator is left in place and must be disposed before the key can be
    /// reused.
    pub fn register_as(
        &self,
        key: &str,
        mutator: impl Fn(S, &Action) -> Result<S, BoxError> + 'static,
    ) -> Result<Registration<S>, SignalError> {
        self.inner
            .borrow_mut()
            .mutators
            .insert(key.to_string(), Rc::new(mutator))?;
        Ok(self.registration(key.to_string(), Slot::Mutator))
    }

    /// Remove a mutator by key.
    ///
    /// Returns whether a mutator existed and was removed; removing an absent
    /// key is a no-op `false`.
    pub fn dispose(&self, key: &str) -> bool {
        self.inner.borrow_mut().mutators.remove(key)
    }

    /// Remove every mutator.
    ///
    /// # Errors
    ///
    /// Returns the keys that failed to remove.
    pub fn dispose_all(&self) -> Result<(), Vec<String>> {
        self.inner.borrow_mut().mutators.remove_all()
    }

    /// Number of registered mutators.
    pub fn mutator_count(&self) -> usize {
        self.inner.borrow().mutators.len()
    }

    /// Register an observer under a generated key.
    ///
    /// Accepts either a bare next closure or an [`Observer`] record; both
    /// normalize before touching the registry. Returns a [`Registration`]
    /// that detaches exactly this observer.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::MissingObserver`] if the observer has no next
    /// handler.
    pub fn observe(&self, observer: impl Into<Observer<S>>) -> Result<Registration<S>, SignalError> {
        let entry = observer.into().into_entry()?;
        let key = self.inner.borrow_mut().observers.insert_anon(entry);
        Ok(self.registration(key, Slot::Observer))
    }

    /// Register an observer under a caller-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::MissingObserver`] for an observer with no next
    /// handler, or [`SignalError::DuplicateKey`] if the key is live.
    pub fn observe_as(
        &self,
        key: &str,
        observer: impl Into<Observer<S>>,
    ) -> Result<Registration<S>, SignalError> {
        let entry = observer.into().into_entry()?;
        self.inner
            .borrow_mut()
            .observers
            .insert(key.to_string(), entry)?;
        Ok(self.registration(key.to_string(), Slot::Observer))
    }

    /// Alias of [`observe`](Signal::observe).
    pub fn subscribe(
        &self,
        observer: impl Into<Observer<S>>,
    ) -> Result<Registration<S>, SignalError> {
        self.observe(observer)
    }

    /// Remove an observer by key.
    pub fn detach(&self, key: &str) -> bool {
        self.inner.borrow_mut().observers.remove(key)
    }

    /// Remove every observer.
    ///
    /// # Errors
    ///
    /// Returns the keys that failed to remove.
    pub fn detach_all(&self) -> Result<(), Vec<String>> {
        self.inner.borrow_mut().observers.remove_all()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Bridge an external event source into this store.
    ///
    /// The source's `observe` method receives a sink that feeds every payload
    /// to [`emit`](Signal::emit); whatever subscription handle the source
    /// returns is passed back to the caller. Non-object payloads from the
    /// source are logged and dropped.
    pub fn mount<T: Source>(&self, source: &mut T) -> T::Handle {
        let signal = self.clone();
        source.observe(Box::new(move |payload| {
            if let Err(err) = signal.emit(payload) {
                warn!("sigfold: mounted source emitted an invalid action: {err}");
            }
        }))
    }

    fn registration(&self, key: String, slot: Slot) -> Registration<S> {
        Registration {
            inner: Rc::downgrade(&self.inner),
            key,
            slot,
            disposed: false,
        }
    }
}

/// An external event source that can be [`mount`](Signal::mount)ed.
///
/// Anything exposing an `observe`-compatible subscription method qualifies:
/// navigation/history adapters, keyboard streams, other signals.
pub trait Source {
    /// The source's own subscription handle, returned through `mount`.
    type Handle;

    /// Subscribe `sink` to this source's payloads.
    fn observe(&mut self, sink: Box<dyn FnMut(Value)>) -> Self::Handle;
}

#[derive(Clone, Copy)]
#[derive(Debug)]
enum Slot {
    Mutator,
    Observer,
}

/// Handle for removing one mutator or observer registration.
///
/// Returned by the register/observe family. Disposal removes exactly the
/// registration that produced the handle and is idempotent — the second call
/// is a harmless `false`. Dropping the handle leaves the registration live.
#[derive(Debug)]
pub struct Registration<S> {
    inner: Weak<RefCell<Inner<S>>>,
    key: String,
    slot: Slot,
    disposed: bool,
}

impl<S> Registration<S> {
    /// The key this registration was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remove the registration from its store.
    ///
    /// Returns whether an entry was removed. Returns `false` on repeat
    /// calls, when the entry was already removed by key, or when the store
    /// itself is gone.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;

        match self.inner.upgrade() {
            Some(inner) => {
                let mut inner = inner.borrow_mut();
                match self.slot {
                    Slot::Mutator => inner.mutators.remove(&self.key),
                    Slot::Observer => inner.observers.remove(&self.key),
                }
            }
            None => false,
        }
    }
}
