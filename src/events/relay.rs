//! EventRelay — single-subscriber delivery of deep-link events
//!
//! Holds at most one sink. Subscribing replaces the current sink without
//! notifying it; publishing with no sink drops the event. Nothing is ever
//! buffered, replayed, reordered or deduplicated.

use log::{debug, info};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Receiver of published events
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &str);
}

impl<F> EventSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn deliver(&self, event: &str) {
        self(event)
    }
}

/// Sink that forwards events into a tokio channel
///
/// The stream form of a platform event channel: the UI side drains the
/// receiver at its own pace.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, event: &str) {
        if self.tx.send(event.to_string()).is_err() {
            debug!("Event receiver closed; event discarded");
        }
    }
}

/// Identifies one subscribe call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to a published event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered(SubscriptionId),
    /// No sink was registered
    Dropped,
}

struct Subscription {
    id: SubscriptionId,
    sink: Arc<dyn EventSink>,
}

/// The relay itself; share it behind an `Arc`
#[derive(Default)]
pub struct EventRelay {
    slot: Mutex<Option<Subscription>>,
}

impl fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRelay")
            .field("subscriber", &self.current())
            .finish()
    }
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sink`, replacing any previous one
    pub fn subscribe(&self, sink: impl EventSink + 'static) -> SubscriptionId {
        self.subscribe_arc(Arc::new(sink))
    }

    pub fn subscribe_arc(&self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        let previous = self.lock().replace(Subscription { id, sink });
        match previous {
            Some(old) => info!("Event subscriber {} replaced by {}", old.id, id),
            None => info!("Event subscriber {} registered", id),
        }
        id
    }

    /// Subscribe a fresh channel and hand back its receiving half
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<String>) {
        let (sink, rx) = ChannelSink::new();
        (self.subscribe(sink), rx)
    }

    /// Clear the slot
    pub fn unsubscribe(&self) {
        if let Some(old) = self.lock().take() {
            info!("Event subscriber {} cancelled", old.id);
        }
    }

    /// Deliver `event` to the current sink, or drop it
    ///
    /// The sink runs after the slot lock is released, so it may call back
    /// into the relay. A publish racing a subscribe goes to whichever sink
    /// held the slot when the publish read it.
    pub fn publish(&self, event: &str) -> Delivery {
        let target = self
            .lock()
            .as_ref()
            .map(|sub| (sub.id, Arc::clone(&sub.sink)));
        match target {
            Some((id, sink)) => {
                sink.deliver(event);
                debug!("Event delivered to {}", id);
                Delivery::Delivered(id)
            }
            None => {
                debug!("No subscriber; dropped event {}", event);
                Delivery::Dropped
            }
        }
    }

    pub fn current(&self) -> Option<SubscriptionId> {
        self.lock().as_ref().map(|sub| sub.id)
    }

    pub fn has_subscriber(&self) -> bool {
        self.current().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Subscription>> {
        // a panicking sink never runs under this lock, so the slot is intact
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
