#![forbid(unsafe_code)]

//! Error taxonomy for attribute cells.
//!
//! Failures split into two channels:
//!
//! - Misuse errors ([`AttributeError`]) are returned synchronously to the
//!   caller of the offending operation.
//! - Subscriber failures ([`SubscriberPanic`]) are caught at the notification
//!   boundary and routed to the owning factory's [`ErrorSink`]. They never
//!   unwind into the caller of `set()` or `get()`.
//!
//! A panic raised by a computed cell's source function belongs to neither
//! channel: it propagates to the caller of `get()` and the cell retains its
//! last successful observation.

use std::any::Any;
use std::rc::Rc;

use thiserror::Error;

/// Errors returned directly to callers of the cell API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttributeError {
    /// `set`/`update` was called on a computed cell. Computed cells derive
    /// their value from a source function and cannot be assigned directly.
    #[error("computed attributes cannot be assigned directly")]
    SetUnsupported,
}

/// A subscriber callback panicked while being notified of a change.
///
/// The panic payload is stringified at the catch site; non-string payloads
/// (from `panic_any`) are replaced with a placeholder.
#[derive(Debug, Error)]
#[error("subscriber panicked during notification: {message}")]
pub struct SubscriberPanic {
    message: String,
}

impl SubscriberPanic {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }

    /// The stringified panic payload.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Shared failure callback for subscriber panics.
///
/// One sink per [`Attributes`](crate::Attributes) factory; every cell the
/// factory mints holds a reference. The sink is an explicit dependency
/// injected at factory creation, never ambient global state.
pub type ErrorSink = Rc<dyn Fn(SubscriberPanic)>;
