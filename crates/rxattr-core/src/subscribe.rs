#![forbid(unsafe_code)]

//! Subscriber registry and notification dispatch.
//!
//! # Design
//!
//! Both cell flavors share one registry type: an ordered list of
//! `(id, consumer)` entries behind `Rc<RefCell<..>>`. Dispatch iterates a
//! snapshot taken before the first callback runs, so a consumer may
//! subscribe or unsubscribe anything (itself included) mid-notification
//! without corrupting iteration. An entry removed mid-pass is skipped for
//! the remainder of that pass.
//!
//! A panicking consumer is caught at the dispatch boundary, converted to a
//! [`SubscriberPanic`], and forwarded to the error sink; the remaining
//! consumers still run.
//!
//! # Failure Modes
//!
//! - **Re-entrant `set` from a consumer**: panics (`RefCell` borrow rules).
//!   Re-entrant mutations of the producing cell indicate a design bug in the
//!   subscriber graph.

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::{ErrorSink, SubscriberPanic};

type Consumer<A> = Rc<dyn Fn(&A)>;

/// Ordered subscriber registry shared between a cell and its handles.
pub(crate) struct SubscriberSet<A> {
    /// Entries in subscription order. Ids are unique per registry and never
    /// reused.
    entries: SmallVec<[(u64, Consumer<A>); 4]>,
    next_id: u64,
}

pub(crate) type SharedSubscribers<A> = Rc<RefCell<SubscriberSet<A>>>;

impl<A> SubscriberSet<A> {
    pub(crate) fn new() -> SharedSubscribers<A> {
        Rc::new(RefCell::new(Self {
            entries: SmallVec::new(),
            next_id: 0,
        }))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Append `consumer` to the registry and return its cancel token.
///
/// Subscribing never invokes the consumer with the current value;
/// notification is edge-triggered only.
pub(crate) fn attach<A: 'static>(
    subscribers: &SharedSubscribers<A>,
    consumer: impl Fn(&A) + 'static,
) -> SubscriptionHandle {
    let id = {
        let mut set = subscribers.borrow_mut();
        let id = set.next_id;
        set.next_id += 1;
        set.entries.push((id, Rc::new(consumer)));
        id
    };
    let weak: Weak<RefCell<SubscriberSet<A>>> = Rc::downgrade(subscribers);
    SubscriptionHandle {
        cancel: Box::new(move || {
            if let Some(set) = weak.upgrade() {
                set.borrow_mut().remove(id);
            }
        }),
    }
}

/// Invoke every live subscriber with `value`, isolating panics.
///
/// The registry borrow is released before any consumer runs, and re-checked
/// per entry so an unsubscribe from within an earlier consumer suppresses
/// later delivery in the same pass.
pub(crate) fn dispatch<A>(subscribers: &SharedSubscribers<A>, value: &A, errors: &ErrorSink) {
    let snapshot: Vec<(u64, Consumer<A>)> = subscribers.borrow().entries.iter().cloned().collect();
    for (id, consumer) in snapshot {
        if !subscribers.borrow().contains(id) {
            continue;
        }
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| consumer(value))) {
            let failure = SubscriberPanic::from_payload(payload);
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "attribute.subscriber_panic", error = %failure);
            errors(failure);
        }
    }
}

/// Opaque token owning exactly one subscriber entry.
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes the entry; calling it
/// again, or after the owning cell has been dropped, is a no-op. The handle
/// does **not** unsubscribe on drop — a discarded handle leaves its consumer
/// subscribed for the cell's lifetime.
pub struct SubscriptionHandle {
    cancel: Box<dyn Fn()>,
}

impl SubscriptionHandle {
    /// Remove this handle's subscriber from the owning cell. Idempotent.
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle").finish_non_exhaustive()
    }
}
