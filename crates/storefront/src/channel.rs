//! Single-slot publish/subscribe cell.
//!
//! The channel caches the most recently published value. Subscribers are
//! invoked immediately with the cached value (if any) and then with every
//! later publish, synchronously and in registration order. Dropping the
//! returned [`Subscription`] unsubscribes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Latest-value broadcast cell with replay on subscribe.
///
/// Cheap to clone; clones share the same slot and observer list.
pub struct SnapshotChannel<T> {
    inner: Arc<Mutex<ChannelState<T>>>,
}

struct ChannelState<T> {
    current: Option<T>,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
}

impl<T> Clone for SnapshotChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Default for SnapshotChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> SnapshotChannel<T> {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChannelState {
                current: None,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Replace the current value and notify every observer.
    ///
    /// Observers run in the caller's context, after the internal lock is
    /// released, so an observer may publish or subscribe itself.
    pub fn publish(&self, value: T) {
        let observers = {
            let mut state = self.lock();
            state.current = Some(value.clone());
            state
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect::<Vec<_>>()
        };

        for observer in observers {
            observer(&value);
        }
    }

    /// Register an observer.
    ///
    /// The observer is called right away with the cached value when there
    /// is one, then on every later publish until the subscription drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);
        let (id, replay) = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push((id, Arc::clone(&observer)));
            (id, state.current.clone())
        };

        if let Some(value) = replay {
            observer(&value);
        }

        let weak: Weak<Mutex<ChannelState<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .observers
                        .retain(|(observer_id, _)| *observer_id != id);
                }
            })),
        }
    }

    /// Clone of the most recently published value.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.lock().current.clone()
    }

    /// Number of active observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        // Observers never run under the lock, so a poisoned state is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for a registered observer. Unsubscribes on drop.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
