use thiserror::Error;

/// Boxed error type returned by fallible mutators.
///
/// The store is single-threaded, so no `Send + Sync` bounds are required.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Errors produced by the store.
///
/// The contract-violation variants (`InvalidPayload`, `MissingObserver`,
/// `DuplicateKey`) are returned synchronously from the call that violated the
/// contract and nothing is scheduled or registered. `MutatorFold` is never
/// returned to the caller of [`emit`](crate::Signal::emit) — it is delivered
/// asynchronously to observers' error handlers during dispatch.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The action payload was not a JSON object.
    #[error("invalid action payload: expected an object, got {kind}")]
    InvalidPayload {
        /// JSON kind of the rejected value (`"a string"`, `"an array"`, ...).
        kind: &'static str,
    },

    /// An observer was submitted without a next handler.
    #[error("observer requires a next handler to subscribe/observe")]
    MissingObserver,

    /// A keyed registration targeted a key that is already live.
    ///
    /// The existing registration is left untouched — dispose/detach it first
    /// to reuse the key.
    #[error("key '{0}' is already registered")]
    DuplicateKey(String),

    /// A mutator failed mid-fold.
    ///
    /// The fold was aborted, no later mutator ran, and the state before the
    /// action was retained.
    #[error("mutator '{key}' failed")]
    MutatorFold {
        /// Registration key of the mutator that failed.
        key: String,
        /// The mutator's own error.
        #[source]
        source: BoxError,
    },
}
