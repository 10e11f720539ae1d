#![forbid(unsafe_code)]

//! The public attribute surface: one capability type over exactly two cell
//! flavors.
//!
//! [`Attribute<A>`] is a closed tagged union of a value cell and a computed
//! cell — not a trait hierarchy. Both flavors share the subscription contract
//! and the factory-bound error sink; they differ only in where the value
//! comes from (`set` versus the source function) and in which operations they
//! reject.

use crate::computed::ComputedCell;
use crate::error::{AttributeError, ErrorSink};
use crate::subscribe::SubscriptionHandle;
use crate::value::ValueCell;

enum Repr<A> {
    Value(ValueCell<A>),
    Computed(ComputedCell<A>),
}

/// A reactive cell: readable, observable, and — for value cells — writable.
///
/// Cloning an `Attribute` creates a new handle to the **same** cell; clones
/// share the value, the version counter, and the subscriber registry.
/// Construction goes through [`Attributes`](crate::Attributes), which binds
/// the factory's error sink to every cell it mints.
pub struct Attribute<A> {
    repr: Repr<A>,
}

impl<A> Clone for Attribute<A> {
    fn clone(&self) -> Self {
        Self {
            repr: match &self.repr {
                Repr::Value(cell) => Repr::Value(cell.clone()),
                Repr::Computed(cell) => Repr::Computed(cell.clone()),
            },
        }
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for Attribute<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never runs a computed cell's source function.
        match &self.repr {
            Repr::Value(cell) => std::fmt::Debug::fmt(cell, f),
            Repr::Computed(cell) => std::fmt::Debug::fmt(cell, f),
        }
    }
}

impl<A: Clone + PartialEq + 'static> Attribute<A> {
    pub(crate) fn value(errors: ErrorSink, initial: A) -> Self {
        Self {
            repr: Repr::Value(ValueCell::new(errors, initial)),
        }
    }

    pub(crate) fn computed(errors: ErrorSink, source: impl Fn() -> A + 'static) -> Self {
        Self {
            repr: Repr::Computed(ComputedCell::new(errors, source)),
        }
    }

    /// Current value.
    ///
    /// For a value cell this is a clone of the stored value. For a computed
    /// cell this re-evaluates the source function and may notify subscribers
    /// if the result differs from the previous observation.
    #[must_use]
    pub fn get(&self) -> A {
        match &self.repr {
            Repr::Value(cell) => cell.get(),
            Repr::Computed(cell) => cell.get(),
        }
    }

    /// Borrow access to the current value.
    ///
    /// For a computed cell this evaluates first (same semantics as
    /// [`get`](Self::get)) and lends the fresh result.
    pub fn with<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        match &self.repr {
            Repr::Value(cell) => cell.with(f),
            Repr::Computed(cell) => cell.with(f),
        }
    }

    /// Replace the stored value.
    ///
    /// The new value is stored unconditionally; subscribers are notified only
    /// when it differs (by `PartialEq`) from the previous value.
    ///
    /// # Errors
    ///
    /// [`AttributeError::SetUnsupported`] on a computed cell.
    pub fn set(&self, value: A) -> Result<(), AttributeError> {
        match &self.repr {
            Repr::Value(cell) => {
                cell.set(value);
                Ok(())
            }
            Repr::Computed(_) => Err(AttributeError::SetUnsupported),
        }
    }

    /// Mutate the stored value in place, notifying on change.
    ///
    /// # Errors
    ///
    /// [`AttributeError::SetUnsupported`] on a computed cell.
    pub fn update(&self, f: impl FnOnce(&mut A)) -> Result<(), AttributeError> {
        match &self.repr {
            Repr::Value(cell) => {
                cell.update(f);
                Ok(())
            }
            Repr::Computed(_) => Err(AttributeError::SetUnsupported),
        }
    }

    /// Register `consumer` for change notifications, in subscription order.
    ///
    /// The consumer is not invoked with the current value; notification is
    /// edge-triggered. The returned handle must be kept only if the caller
    /// intends to unsubscribe — discarding it leaves the consumer subscribed.
    pub fn subscribe(&self, consumer: impl Fn(&A) + 'static) -> SubscriptionHandle {
        match &self.repr {
            Repr::Value(cell) => cell.subscribe(consumer),
            Repr::Computed(cell) => cell.subscribe(consumer),
        }
    }

    /// Number of notifying changes so far. Useful for dirty-checking.
    #[must_use]
    pub fn version(&self) -> u64 {
        match &self.repr {
            Repr::Value(cell) => cell.version(),
            Repr::Computed(cell) => cell.version(),
        }
    }

    /// Current subscriber registry size.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match &self.repr {
            Repr::Value(cell) => cell.subscriber_count(),
            Repr::Computed(cell) => cell.subscriber_count(),
        }
    }

    /// Whether this attribute is a directly assigned value cell.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self.repr, Repr::Value(_))
    }

    /// Whether this attribute derives its value from a source function.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self.repr, Repr::Computed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn quiet() -> ErrorSink {
        Rc::new(|_| {})
    }

    #[test]
    fn discriminators() {
        let value = Attribute::value(quiet(), 1);
        let computed = Attribute::computed(quiet(), || 1);
        assert!(value.is_value() && !value.is_computed());
        assert!(computed.is_computed() && !computed.is_value());
    }

    #[test]
    fn set_on_computed_is_rejected() {
        let computed = Attribute::computed(quiet(), || 1);
        assert_eq!(computed.set(2), Err(AttributeError::SetUnsupported));
        assert_eq!(
            computed.update(|v| *v += 1),
            Err(AttributeError::SetUnsupported)
        );
        // The rejection left the cell untouched.
        assert_eq!(computed.get(), 1);
        assert_eq!(computed.version(), 0);
    }

    #[test]
    fn set_on_value_succeeds() {
        let value = Attribute::value(quiet(), 1);
        value.set(2).unwrap();
        assert_eq!(value.get(), 2);
    }

    #[test]
    fn edge_triggered_log() {
        // a.set(1) → []; a.set(2) → [2]; a.set(2) → [2]; a.set(3) → [2, 3].
        let a = Attribute::value(quiet(), 1);
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let _h = a.subscribe(move |v| log_clone.borrow_mut().push(*v));

        a.set(1).unwrap();
        assert!(log.borrow().is_empty());
        a.set(2).unwrap();
        assert_eq!(*log.borrow(), vec![2]);
        a.set(2).unwrap();
        assert_eq!(*log.borrow(), vec![2]);
        a.set(3).unwrap();
        assert_eq!(*log.borrow(), vec![2, 3]);
    }

    #[test]
    fn unsubscribe_from_within_sibling_callback() {
        let a = Attribute::value(quiet(), 0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let victim: Rc<RefCell<Option<SubscriptionHandle>>> = Rc::new(RefCell::new(None));
        let victim_clone = Rc::clone(&victim);
        let log_first = Rc::clone(&log);
        let _h1 = a.subscribe(move |v| {
            log_first.borrow_mut().push(("first", *v));
            if let Some(handle) = victim_clone.borrow().as_ref() {
                handle.unsubscribe();
            }
        });

        let log_second = Rc::clone(&log);
        let h2 = a.subscribe(move |v| log_second.borrow_mut().push(("second", *v)));
        *victim.borrow_mut() = Some(h2);

        a.set(1).unwrap();
        a.set(2).unwrap();
        assert_eq!(*log.borrow(), vec![("first", 1), ("first", 2)]);
    }

    #[test]
    fn chained_attributes_pull_through_the_root() {
        let base = Attribute::value(quiet(), 2);
        let base_clone = base.clone();
        let squared = Attribute::computed(quiet(), move || {
            let v = base_clone.get();
            v * v
        });
        let squared_clone = squared.clone();
        let shifted = Attribute::computed(quiet(), move || squared_clone.get() + 1);

        assert_eq!(shifted.get(), 5);

        base.set(3).unwrap();
        // Nothing re-evaluates until the root of the chain is read.
        assert_eq!(squared.version(), 0);
        assert_eq!(shifted.get(), 10);
    }

    #[test]
    fn clone_shares_cell() {
        let a = Attribute::value(quiet(), 0);
        let b = a.clone();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _h = b.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        a.set(5).unwrap();
        assert_eq!(b.get(), 5);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn debug_shows_cell_flavor() {
        let value = Attribute::value(quiet(), 42);
        let computed = Attribute::computed(quiet(), || 42);
        assert!(format!("{value:?}").contains("ValueCell"));
        assert!(format!("{computed:?}").contains("ComputedCell"));
    }
}
