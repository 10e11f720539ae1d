#![forbid(unsafe_code)]

//! The sole construction surface for attributes.
//!
//! An [`Attributes`] factory closes over one [`ErrorSink`] and binds it to
//! every cell it creates, so all cells from one factory share a single
//! failure-isolation policy. Sinks are per-factory, never process-global;
//! independent factories route failures independently.

use std::rc::Rc;

use crate::attribute::Attribute;
use crate::error::{ErrorSink, SubscriberPanic};

/// Factory for attribute cells sharing one error sink.
///
/// Cloning shares the sink; cells minted by a clone report to the same place.
/// A factory may mint unlimited independent attributes and has no teardown.
#[derive(Clone)]
pub struct Attributes {
    errors: ErrorSink,
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attributes").finish_non_exhaustive()
    }
}

impl Attributes {
    /// Create a factory whose cells forward subscriber panics to
    /// `error_sink`.
    #[must_use]
    pub fn create(error_sink: impl Fn(SubscriberPanic) + 'static) -> Self {
        Self {
            errors: Rc::new(error_sink),
        }
    }

    /// Create a value cell seeded with `initial`.
    ///
    /// Construction is infallible: an absent initial value is unrepresentable
    /// in the type system, so the invalid-argument case cannot occur.
    #[must_use]
    pub fn with_value<A: Clone + PartialEq + 'static>(&self, initial: A) -> Attribute<A> {
        Attribute::value(Rc::clone(&self.errors), initial)
    }

    /// Create a computed cell wrapping `source`.
    ///
    /// `source` is invoked lazily on each `get()`, never at construction
    /// time.
    #[must_use]
    pub fn from_function<A: Clone + PartialEq + 'static>(
        &self,
        source: impl Fn() -> A + 'static,
    ) -> Attribute<A> {
        Attribute::computed(Rc::clone(&self.errors), source)
    }
}
