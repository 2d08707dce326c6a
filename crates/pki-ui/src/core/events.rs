//! Named-event listener registry with owned subscription handles.
//!
//! # Design
//! - Listeners are keyed by event name (`change:<field>`, `close`, ...).
//! - A [`Subscription`] removes its listener when dropped, so a rebound row
//!   slot never keeps listening to the entity it used to show.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Entry<T> {
    id: u64,
    event: String,
    listener: Listener<T>,
}

struct Registry<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry<T>>>,
}

/// Single-threaded event emitter carrying payloads of type `T`.
pub struct Emitter<T> {
    registry: Rc<Registry<T>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.registry.entries.borrow().len())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    /// Create an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`. The listener lives as long as the
    /// returned handle.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn subscribe(&self, event: impl Into<String>, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.entries.borrow_mut().push(Entry {
            id,
            event: event.into(),
            listener: Rc::new(listener),
        });
        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.entries.borrow_mut().retain(|entry| entry.id != id);
                }
            })),
        }
    }

    /// Invoke every listener registered for `event`.
    pub fn emit(&self, event: &str, payload: &T) {
        // Snapshot first: listeners may subscribe or cancel while running.
        let listeners: Vec<Listener<T>> = self
            .registry
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.event == event)
            .map(|entry| Rc::clone(&entry.listener))
            .collect();
        for listener in listeners {
            listener(payload);
        }
    }

    /// Number of live listeners across all events.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.entries.borrow().len()
    }
}

/// Handle for a registered listener; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Emitter;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_only_matching_listeners() {
        let emitter = Emitter::<String>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _name = emitter.subscribe("change:name", move |value: &String| {
            sink.borrow_mut().push(value.clone());
        });
        emitter.emit("change:name", &"alice".to_string());
        emitter.emit("change:email", &"ignored".to_string());
        assert_eq!(*seen.borrow(), vec!["alice".to_string()]);
    }

    #[test]
    fn dropping_subscription_removes_listener() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let subscription = emitter.subscribe("close", move |()| *counter.borrow_mut() += 1);
        emitter.emit("close", &());
        drop(subscription);
        emitter.emit("close", &());
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn cancel_is_explicit_unsubscribe() {
        let emitter = Emitter::<()>::new();
        let subscription = emitter.subscribe("close", |()| {});
        assert_eq!(emitter.listener_count(), 1);
        subscription.cancel();
        assert_eq!(emitter.listener_count(), 0);
    }
}
