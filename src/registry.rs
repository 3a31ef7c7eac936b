//! Ordered keyed registries for mutators and observers.
//!
//! Iteration order is insertion order and survives removals — removing an
//! entry never reorders the survivors. Not exported; the store exposes only
//! key-based operations.

use crate::error::SignalError;
use uuid::Uuid;

/// Generate an opaque registration key.
pub(crate) fn uid() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) struct Registry<V> {
    entries: Vec<(String, V)>,
}

impl<V> Registry<V> {
    pub(crate) fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert under a caller-supplied key.
    ///
    /// Insertion only happens when the key is free — the caller must dispose
    /// the previous registration first.
    pub(crate) fn insert(&mut self, key: String, value: V) -> Result<(), SignalError> {
        if self.contains(&key) {
            return Err(SignalError::DuplicateKey(key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Insert under a generated key, returning it.
    ///
    /// The key is re-drawn on the improbable collision with a live key, so
    /// generated keys never clobber an existing registration.
    pub(crate) fn insert_anon(&mut self, value: V) -> String {
        let key = loop {
            let key = uid();
            if !self.contains(&key) {
                break key;
            }
        };
        self.entries.push((key.clone(), value));
        key
    }

    /// Remove by key, preserving the order of survivors.
    ///
    /// Returns whether an entry existed and was removed. Removing an absent
    /// key is a no-op.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every entry.
    ///
    /// Returns `Ok(())` when all removals succeeded, otherwise the keys that
    /// failed to remove. With a single-threaded registry removal cannot fail,
    /// but the signature keeps removal races observable rather than silent.
    pub(crate) fn remove_all(&mut self) -> Result<(), Vec<String>> {
        let keys: Vec<String> = self.entries.iter().map(|(k, _)| k.clone()).collect();
        let failed: Vec<String> = keys.into_iter().filter(|k| !self.remove(k)).collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(failed)
        }
    }

    /// Ordered snapshot of the current entries.
    ///
    /// Dispatch clones a snapshot before invoking any callback, so
    /// registrations and removals requested mid-cycle only affect the next
    /// cycle and never invalidate in-flight iteration.
    pub(crate) fn snapshot(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.entries.clone()
    }
}

/// Fold `step` over keyed entries in order, threading an accumulator.
///
/// The first error aborts the fold — later entries are not visited.
pub(crate) fn fold_entries<A, V, E>(
    entries: &[(String, V)],
    init: A,
    mut step: impl FnMut(A, &str, &V) -> Result<A, E>,
) -> Result<A, E> {
    let mut acc = init;
    for (key, value) in entries {
        acc = step(acc, key, value)?;
    }
    Ok(acc)
}
