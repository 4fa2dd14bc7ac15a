//! Event forwarding for latebind contracts.
//!
//! A contract declares the events an object can raise as
//! [`latebind::EventSpec`] values. This crate provides the subscription
//! side: an [`EventRelay`] validates raised events against the declared
//! specs and forwards them to any number of notification sinks while
//! attached. Member lookup and scoring stay in the core crate; nothing
//! here is scored.

pub mod relay;
pub mod sink;

pub use relay::{EventError, EventRelay};
pub use sink::{ChannelSink, EventNotification, EventSink, TracingSink};
