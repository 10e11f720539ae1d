#![forbid(unsafe_code)]

//! Reactive attribute cells.
//!
//! This crate provides a single-threaded reactive-value primitive:
//!
//! - [`Attribute`]: a cell whose current value can be read, observed for
//!   changes, and — for value cells — replaced directly. Computed cells
//!   derive their value from a source function on each read.
//! - [`Attributes`]: the factory that mints cells and binds one shared
//!   [`ErrorSink`] to all of them.
//! - [`SubscriptionHandle`]: cancel token for one subscriber entry.
//!
//! # Architecture
//!
//! Cells use `Rc<RefCell<..>>` for single-threaded shared ownership; cloning
//! a cell or a factory clones the handle, not the state. Evaluation is
//! pull-driven: a computed cell re-evaluates only when something calls
//! `get()`. Notification is push-style once a change is observed, and a
//! panicking subscriber is routed to the factory's error sink instead of
//! unwinding into the producer.
//!
//! # Invariants
//!
//! 1. At any quiescent point, `get()` reflects the last stored or computed
//!    value.
//! 2. Subscribers are invoked only when the newly observed value differs
//!    (`PartialEq`) from the previous one, in subscription order.
//! 3. Notification iterates a snapshot: subscribers may subscribe or
//!    unsubscribe during a pass, and an entry unsubscribed mid-pass is not
//!    invoked later in that pass.
//! 4. A subscriber panic never prevents sibling subscribers from running,
//!    never reaches the caller of `set()`/`get()`, and is forwarded to the
//!    error sink once per failing call.
//! 5. `version()` increments by exactly 1 per notifying change.

pub mod attribute;
pub mod error;
pub mod factory;
pub mod subscribe;

mod computed;
mod value;

pub use attribute::Attribute;
pub use error::{AttributeError, ErrorSink, SubscriberPanic};
pub use factory::Attributes;
pub use subscribe::SubscriptionHandle;
