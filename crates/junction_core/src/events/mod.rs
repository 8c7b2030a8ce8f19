//! # Event System
//!
//! Decoupled notification between subsystems.
//!
//! Publishers call `emit` with any `'static` value; every subscriber to that
//! exact type runs synchronously, in subscription order, before `emit`
//! returns. Subscribers that prefer to process events later take a
//! [`Mailbox`] instead of registering a handler.

mod bus;
mod mailbox;

pub use bus::{EventBus, Receive, SubscriptionId};
pub use mailbox::Mailbox;
