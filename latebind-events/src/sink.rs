//! Notification sinks.

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use latebind::Value;

/// A destination for forwarded events.
///
/// Sinks must tolerate concurrent delivery; the relay calls them from
/// whichever thread raises the event.
pub trait EventSink: Send + Sync {
    /// Called once per raised event while the relay is attached.
    fn on_event(&self, source: &str, event: &str, args: &[Value]);
}

/// Forwards every event to the `tracing` subscriber at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, source: &str, event: &str, args: &[Value]) {
        debug!("event `{}` raised by `{}` with {} argument(s)", event, source, args.len());
    }
}

/// One forwarded event as observed by a [`ChannelSink`] receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNotification {
    pub source: String,
    pub event: String,
    pub args: Vec<Value>,
}

/// Forwards events into an unbounded channel.
pub struct ChannelSink {
    sender: Sender<EventNotification>,
}

impl ChannelSink {
    /// Create a sink plus the receiver observing its notifications.
    pub fn unbounded() -> (Self, Receiver<EventNotification>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&self, source: &str, event: &str, args: &[Value]) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.sender.send(EventNotification {
            source: source.to_string(),
            event: event.to_string(),
            args: args.to_vec(),
        });
    }
}
