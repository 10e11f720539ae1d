#![forbid(unsafe_code)]

//! Value cell: a stored value with change notification.
//!
//! # Design
//!
//! [`ValueCell<A>`] wraps a value and its version counter in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). `set` always stores the new
//! value — so the retained representation stays current even when the old and
//! new values compare equal — but subscribers are notified only when the value
//! actually changed (by `PartialEq`). This keeps idempotent writes from
//! triggering redundant downstream recomputation.
//!
//! # Invariants
//!
//! 1. `get()` after any sequence of `set`s returns the last written value.
//! 2. `version` increments by exactly 1 per notifying change.
//! 3. Subscribers run in subscription order, outside the state borrow.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ErrorSink;
use crate::subscribe::{self, SharedSubscribers, SubscriberSet, SubscriptionHandle};

struct ValueState<A> {
    value: A,
    version: u64,
}

/// A directly assigned cell. Cloning shares the inner state.
pub(crate) struct ValueCell<A> {
    state: Rc<RefCell<ValueState<A>>>,
    subscribers: SharedSubscribers<A>,
    errors: ErrorSink,
}

impl<A> Clone for ValueCell<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            subscribers: Rc::clone(&self.subscribers),
            errors: Rc::clone(&self.errors),
        }
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for ValueCell<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ValueCell")
            .field("value", &state.value)
            .field("version", &state.version)
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<A: Clone + PartialEq + 'static> ValueCell<A> {
    pub(crate) fn new(errors: ErrorSink, initial: A) -> Self {
        Self {
            state: Rc::new(RefCell::new(ValueState {
                value: initial,
                version: 0,
            })),
            subscribers: SubscriberSet::new(),
            errors,
        }
    }

    pub(crate) fn get(&self) -> A {
        self.state.borrow().value.clone()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        f(&self.state.borrow().value)
    }

    /// Store `value` unconditionally; notify only when it differs from the
    /// previous value.
    pub(crate) fn set(&self, value: A) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.value != value;
            state.value = value;
            if changed {
                state.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Mutate in place; notify when the result differs from a pre-mutation
    /// snapshot.
    pub(crate) fn update(&self, f: impl FnOnce(&mut A)) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.value.clone();
            f(&mut state.value);
            let changed = state.value != before;
            if changed {
                state.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    pub(crate) fn subscribe(&self, consumer: impl Fn(&A) + 'static) -> SubscriptionHandle {
        subscribe::attach(&self.subscribers, consumer)
    }

    pub(crate) fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self) {
        let value = self.state.borrow().value.clone();
        #[cfg(feature = "tracing")]
        {
            let version = self.state.borrow().version;
            let subscribers = self.subscribers.borrow().len();
            tracing::trace!(message = "attribute.notify", kind = "value", version, subscribers);
        }
        subscribe::dispatch(&self.subscribers, &value, &self.errors);
    }
}
