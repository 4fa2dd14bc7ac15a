//! The event relay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, trace};

use latebind::{ConversionOracle, EventSpec, TypeRegistry, Value};

use crate::sink::EventSink;

/// Errors raised when an event cannot be forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The raised name matches no declared event.
    #[error("unknown event `{event}`")]
    UnknownEvent { event: String },

    /// The payload does not fit the declared parameter list.
    #[error("event `{event}` payload argument {index} does not match its declared type")]
    PayloadMismatch { event: String, index: usize },
}

/// Forwards raised events to notification sinks.
///
/// The relay is built from a contract's declared [`EventSpec`] list. Its
/// attach flag is the only mutable dispatch-adjacent state in the system:
/// while detached, raised events are validated but not forwarded.
pub struct EventRelay {
    source: Arc<str>,
    specs: Vec<EventSpec>,
    types: Arc<TypeRegistry>,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
    attached: AtomicBool,
}

impl EventRelay {
    /// Create a detached relay for a named source object.
    pub fn new(
        source: impl Into<Arc<str>>,
        specs: Vec<EventSpec>,
        types: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            source: source.into(),
            specs,
            types,
            sinks: RwLock::new(Vec::new()),
            attached: AtomicBool::new(false),
        }
    }

    /// The declared events this relay forwards.
    pub fn specs(&self) -> &[EventSpec] {
        &self.specs
    }

    /// Add a notification sink. Sinks receive every event raised while
    /// the relay is attached.
    pub fn add_sink(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    /// Start forwarding raised events.
    pub fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
        debug!("relay for `{}` attached", self.source);
    }

    /// Stop forwarding raised events.
    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
        debug!("relay for `{}` detached", self.source);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Raise an event by name.
    ///
    /// The name and payload are validated against the declared spec in
    /// every case; forwarding to sinks happens only while attached.
    pub fn raise(&self, event: &str, args: &[Value]) -> Result<(), EventError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.name() == event)
            .ok_or_else(|| EventError::UnknownEvent {
                event: event.to_string(),
            })?;

        let params = spec.params();
        if args.len() != params.len() {
            return Err(EventError::PayloadMismatch {
                event: event.to_string(),
                index: args.len().min(params.len()),
            });
        }
        let oracle = ConversionOracle::new(&self.types);
        for (index, (arg, declared)) in args.iter().zip(params).enumerate() {
            let fits = match arg.type_desc() {
                None => oracle.is_nullable(declared),
                Some(actual) => oracle.can_convert(&actual, declared),
            };
            if !fits {
                return Err(EventError::PayloadMismatch {
                    event: event.to_string(),
                    index,
                });
            }
        }

        if !self.is_attached() {
            trace!("event `{}` raised by `{}` while detached", event, self.source);
            return Ok(());
        }
        for sink in self.sinks.read().iter() {
            sink.on_event(&self.source, event, args);
        }
        Ok(())
    }
}
