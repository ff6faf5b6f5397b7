//! Typed synchronous notifications.
//!
//! A [`Signal`] calls its listeners in registration order, on the emitting
//! thread, before `emit` returns. There is no queueing and no debouncing.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listeners<E> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(u64, Listener<E>)>>,
}

/// A broadcast point for events of type `E`.
///
/// Clones share the same listener list.
pub struct Signal<E> {
    inner: Arc<Listeners<E>>,
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Listeners {
                next_id: AtomicU64::new(0),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until
    /// [`Subscription::unsubscribe`] is called; dropping the handle does
    /// not remove it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.write().push((id, Arc::new(listener)));
        Subscription {
            id,
            signal: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every listener registered at the time of the
    /// call. Listeners may subscribe or emit again from inside the call.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .inner
            .entries
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.entries.read().len()
    }
}

/// Handle for removing a listener.
pub struct Subscription<E> {
    id: u64,
    signal: Weak<Listeners<E>>,
}

impl<E> Subscription<E> {
    /// Remove the listener. Has no effect once the signal is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.signal.upgrade() {
            inner.entries.write().retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_delivery_in_registration_order() {
        let signal: Signal<u32> = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            signal.subscribe(move |n: &u32| seen.lock().push(format!("{tag}{n}")));
        }
        signal.emit(&1);
        signal.emit(&2);

        assert_eq!(*seen.lock(), vec!["a1", "b1", "c1", "a2", "b2", "c2"]);
    }

    #[test]
    fn test_unsubscribe() {
        let signal: Signal<()> = Signal::new();
        let count = Arc::new(AtomicU64::new(0));

        let c = count.clone();
        let sub = signal.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        signal.emit(&());
        sub.unsubscribe();
        signal.emit(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_clones_share_listeners() {
        let signal: Signal<()> = Signal::new();
        let other = signal.clone();
        let count = Arc::new(AtomicU64::new(0));

        let c = count.clone();
        other.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        signal.emit(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_emit() {
        let signal: Signal<u32> = Signal::new();
        let count = Arc::new(AtomicU64::new(0));

        let inner_signal = signal.clone();
        let c = count.clone();
        signal.subscribe(move |n: &u32| {
            c.fetch_add(1, Ordering::SeqCst);
            if *n > 0 {
                inner_signal.emit(&(n - 1));
            }
        });
        signal.emit(&2);

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
