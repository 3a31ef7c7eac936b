mod action;
mod error;
mod observer;
mod registry;
mod signal;

pub use action::Action;
pub use error::{BoxError, SignalError};
pub use observer::Observer;
pub use signal::{MutatorFn, Registration, Signal, Source};
