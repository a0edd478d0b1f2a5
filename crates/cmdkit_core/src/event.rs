//! Ordered listener lists with removable subscriptions.
//!
//! # Responsibility
//! - Deliver one event to every live listener in registration order.
//! - Hand out `Subscription` handles for individual removal.
//!
//! # Invariants
//! - A listener removed while an event is being delivered does not receive
//!   the remainder of that delivery.
//! - Listeners added during delivery only see later events.

use crate::extension::lifecycle::Disposable;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct Slot<E> {
    id: u64,
    listener: Listener<E>,
}

struct EmitterState<E> {
    next_id: Cell<u64>,
    slots: RefCell<Vec<Slot<E>>>,
}

impl<E> EmitterState<E> {
    fn contains(&self, id: u64) -> bool {
        self.slots.borrow().iter().any(|slot| slot.id == id)
    }
}

trait Unsubscribe {
    fn remove(&self, id: u64) -> bool;
    fn contains_id(&self, id: u64) -> bool;
}

impl<E> Unsubscribe for EmitterState<E> {
    fn remove(&self, id: u64) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        slots.len() != before
    }

    fn contains_id(&self, id: u64) -> bool {
        self.contains(id)
    }
}

/// Single-threaded event emitter.
pub struct Emitter<E> {
    state: Rc<EmitterState<E>>,
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(EmitterState {
                next_id: Cell::new(1),
                slots: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Appends a listener and returns its removal handle.
    ///
    /// Dropping the handle does not unsubscribe.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state.slots.borrow_mut().push(Slot {
            id,
            listener: Rc::new(listener),
        });

        let weak: Weak<dyn Unsubscribe> = Rc::downgrade(&self.state) as Weak<dyn Unsubscribe>;
        Subscription { id, emitter: weak }
    }

    /// Delivers `event` to every listener; returns how many were invoked.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<(u64, Listener<E>)> = self
            .state
            .slots
            .borrow()
            .iter()
            .map(|slot| (slot.id, Rc::clone(&slot.listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.state.contains(id) {
                continue;
            }
            listener(event);
            delivered += 1;
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.state.slots.borrow().len()
    }

    /// Drops every listener; outstanding handles become inert.
    pub fn clear(&self) {
        self.state.slots.borrow_mut().clear();
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Removal handle for one listener.
pub struct Subscription {
    id: u64,
    emitter: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// Removes the listener. Returns `false` when it was already gone.
    pub fn unsubscribe(&self) -> bool {
        match self.emitter.upgrade() {
            Some(emitter) => emitter.remove(self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.emitter
            .upgrade()
            .is_some_and(|emitter| emitter.contains_id(self.id))
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::{Emitter, Subscription};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_registration_order() {
        let emitter = Emitter::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            emitter.subscribe(move |value: &u32| seen.borrow_mut().push(format!("{tag}{value}")));
        }

        assert_eq!(emitter.emit(&7), 3);
        assert_eq!(*seen.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let hits = Rc::clone(&hits);
            emitter.subscribe(move |_| hits.borrow_mut().push(1))
        };
        let _second = {
            let hits = Rc::clone(&hits);
            emitter.subscribe(move |_| hits.borrow_mut().push(2))
        };

        assert!(first.unsubscribe());
        assert!(!first.unsubscribe());
        assert!(!first.is_active());
        emitter.emit(&());

        assert_eq!(*hits.borrow(), vec![2]);
    }

    #[test]
    fn listener_removed_mid_delivery_is_skipped() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(RefCell::new(0));
        let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        {
            let victim_slot = Rc::clone(&victim_slot);
            emitter.subscribe(move |_| {
                if let Some(subscription) = victim_slot.borrow().as_ref() {
                    subscription.unsubscribe();
                }
            });
        }
        let victim = {
            let hits = Rc::clone(&hits);
            emitter.subscribe(move |_| *hits.borrow_mut() += 1)
        };
        *victim_slot.borrow_mut() = Some(victim);

        assert_eq!(emitter.emit(&()), 1);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn clear_makes_handles_inert() {
        let emitter = Emitter::<()>::new();
        let handle = emitter.subscribe(|_| {});
        emitter.clear();

        assert_eq!(emitter.listener_count(), 0);
        assert!(!handle.is_active());
        assert!(!handle.unsubscribe());
    }
}
