//! Teardown contract shared by services, commands, and host bindings.
//!
//! # Invariants
//! - Owners invoke `Disposable::dispose` at most once per instance.
//! - `DisposableList` releases entries in insertion order.

use std::cell::RefCell;
use std::rc::Rc;

/// Owner of a releasable resource.
///
/// Implementors may assume their owner calls `dispose` at most once.
pub trait Disposable {
    fn dispose(&self);
}

/// Closure-backed teardown that runs its body on the first `dispose` only.
pub struct DisposeFn {
    body: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl DisposeFn {
    pub fn new(body: impl FnOnce() + 'static) -> Self {
        Self {
            body: RefCell::new(Some(Box::new(body))),
        }
    }

    /// Returns `true` until the body has run.
    pub fn is_pending(&self) -> bool {
        self.body.borrow().is_some()
    }
}

impl Disposable for DisposeFn {
    fn dispose(&self) {
        let body = self.body.borrow_mut().take();
        if let Some(body) = body {
            body();
        }
    }
}

/// Ordered queue of pending teardowns.
///
/// The same instance pushed twice is disposed twice; callers that need
/// de-duplication must do it before pushing.
#[derive(Default)]
pub struct DisposableList {
    entries: RefCell<Vec<Rc<dyn Disposable>>>,
}

impl DisposableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: Rc<dyn Disposable>) {
        self.entries.borrow_mut().push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Disposes every queued entry in insertion order and empties the queue.
    ///
    /// Entries queued while draining are kept for the next call.
    pub fn dispose_all(&self) -> usize {
        let drained = self.entries.take();
        let count = drained.len();
        for entry in drained {
            entry.dispose();
        }
        count
    }
}
