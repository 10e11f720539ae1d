#![forbid(unsafe_code)]

//! rxattr public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub use rxattr_core as core;

pub mod prelude {
    pub use rxattr_core::{
        Attribute, AttributeError, Attributes, ErrorSink, SubscriberPanic, SubscriptionHandle,
    };
}
