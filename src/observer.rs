use crate::error::SignalError;
use std::rc::Rc;

pub(crate) type NextFn<S> = Rc<dyn Fn(&S)>;
pub(crate) type ErrorFn = Rc<dyn Fn(&SignalError)>;

/// A subscriber to the store: a next handler plus an optional error handler.
///
/// The original surface accepted either a bare next callback or a
/// `{next, error}` record; both shapes normalize into this one type before
/// any registry interaction. A bare closure converts via `From`:
///
/// ```
/// use sigfold::{Observer, Signal};
///
/// let signal: Signal<u64> = Signal::new(0);
///
/// // Closure shape
/// signal.observe(|state: &u64| println!("state: {state}")).unwrap();
///
/// // Record shape
/// let observer = Observer::new(|state: &u64| println!("state: {state}"))
///     .on_error(|err| eprintln!("fold failed: {err}"));
/// signal.observe(observer).unwrap();
/// ```
///
/// An observer without a next handler (possible via [`Observer::from_parts`])
/// is rejected at observe time with [`SignalError::MissingObserver`].
pub struct Observer<S> {
    pub(crate) next: Option<NextFn<S>>,
    pub(crate) error: Option<ErrorFn>,
}

impl<S> Observer<S> {
    /// An observer with the given next handler and no error handler.
    pub fn new(next: impl Fn(&S) + 'static) -> Self {
        Observer {
            next: Some(Rc::new(next)),
            error: None,
        }
    }

    /// Attach an error handler, invoked when a fold fails.
    ///
    /// Observers without one never learn of fold failures — they are skipped
    /// silently for error events.
    pub fn on_error(mut self, error: impl Fn(&SignalError) + 'static) -> Self {
        self.error = Some(Rc::new(error));
        self
    }

    /// Assemble an observer from already-optional handlers.
    ///
    /// This is the entry point for dynamic call shapes where a next handler
    /// may be absent; validation happens when the observer is submitted.
    pub fn from_parts(next: Option<NextFn<S>>, error: Option<ErrorFn>) -> Self {
        Observer { next, error }
    }

    /// Validate and split into handlers for registration.
    pub(crate) fn into_entry(self) -> Result<ObserverEntry<S>, SignalError> {
        match self.next {
            Some(next) => Ok(ObserverEntry {
                next,
                error: self.error,
            }),
            None => Err(SignalError::MissingObserver),
        }
    }
}

impl<S, F> From<F> for Observer<S>
where
    F: Fn(&S) + 'static,
{
    fn from(next: F) -> Self {
        Observer::new(next)
    }
}

/// Registered form of an observer: the next handler is guaranteed present.
pub(crate) struct ObserverEntry<S> {
    pub(crate) next: NextFn<S>,
    pub(crate) error: Option<ErrorFn>,
}

impl<S> Clone for ObserverEntry<S> {
    fn clone(&self) -> Self {
        ObserverEntry {
            next: Rc::clone(&self.next),
            error: self.error.clone(),
        }
    }
}
