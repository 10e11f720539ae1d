#![forbid(unsafe_code)]

//! Computed cell: a value derived by invoking a source function on each read.
//!
//! # Design
//!
//! [`ComputedCell<A>`] holds a source closure and the most recent evaluation
//! result. The retained result exists only to detect change since the prior
//! read; it is not authoritative state. Every `get()` re-evaluates the source
//! — evaluation is pull-driven, there is no background polling and no
//! memoization — and notifies subscribers when the new result differs from
//! the previous observation.
//!
//! # Invariants
//!
//! 1. The source function is never invoked at construction time.
//! 2. The first observation seeds the comparison slot without notifying.
//! 3. `version` increments by exactly 1 per notifying change.
//!
//! # Failure Modes
//!
//! - **Source function panics**: the panic propagates to the caller of
//!   `get()`. The last observation remains from the most recent successful
//!   evaluation, so a later successful `get()` compares against it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ErrorSink;
use crate::subscribe::{self, SharedSubscribers, SubscriberSet, SubscriptionHandle};

struct ComputedState<A> {
    /// Most recent evaluation result; `None` before the first `get()`.
    last: Option<A>,
    version: u64,
}

/// A function-derived cell. Cloning shares the inner state.
pub(crate) struct ComputedCell<A> {
    source: Rc<dyn Fn() -> A>,
    state: Rc<RefCell<ComputedState<A>>>,
    subscribers: SharedSubscribers<A>,
    errors: ErrorSink,
}

impl<A> Clone for ComputedCell<A> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            state: Rc::clone(&self.state),
            subscribers: Rc::clone(&self.subscribers),
            errors: Rc::clone(&self.errors),
        }
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for ComputedCell<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ComputedCell")
            .field("last_observed", &state.last)
            .field("version", &state.version)
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<A: Clone + PartialEq + 'static> ComputedCell<A> {
    pub(crate) fn new(errors: ErrorSink, source: impl Fn() -> A + 'static) -> Self {
        Self {
            source: Rc::new(source),
            state: Rc::new(RefCell::new(ComputedState {
                last: None,
                version: 0,
            })),
            subscribers: SubscriberSet::new(),
            errors,
        }
    }

    /// Evaluate the source and return the result, notifying subscribers if it
    /// differs from the previous observation.
    pub(crate) fn get(&self) -> A {
        // No borrow is held during evaluation: the source may read other
        // cells, and a panic here must leave the last observation untouched.
        let result = (self.source)();
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.last.as_ref().is_some_and(|prev| *prev != result);
            state.last = Some(result.clone());
            if changed {
                state.version += 1;
            }
            changed
        };
        if changed {
            self.notify(&result);
        }
        result
    }

    /// Evaluate and give borrow access to the result.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        let value = self.get();
        f(&value)
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

    fn notify(&self, value: &A) {
        #[cfg(feature = "tracing")]
        {
            let version = self.state.borrow().version;
            let subscribers = self.subscribers.borrow().len();
            tracing::trace!(
                message = "attribute.notify",
                kind = "computed",
                version,
                subscribers
            );
        }
        subscribe::dispatch(&self.subscribers, value, &self.errors);
    }
}
