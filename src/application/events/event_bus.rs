//! Event Bus for broadcasting booking events to subscribers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::types::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let customer_id = message.event.customer_id().to_string();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, %customer_id, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, %customer_id, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// What a subscriber got from the bus
#[derive(Debug)]
pub enum Delivery {
    Message(EventMessage),
    /// The subscriber fell behind and this many events were dropped
    Lagged(u64),
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next event, or `None` once the bus is gone. Missed events are
    /// skipped silently; consumers that must react to gaps use
    /// [`EventSubscriber::recv_delivery`].
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.recv_delivery().await? {
                Delivery::Message(msg) => return Some(msg),
                Delivery::Lagged(_) => continue,
            }
        }
    }

    /// Next event or a lag notice, or `None` once the bus is gone. Cache
    /// consumers should treat a lag as "drop everything" since they cannot
    /// know which keys went stale.
    pub async fn recv_delivery(&mut self) -> Option<Delivery> {
        match self.receiver.recv().await {
            Ok(msg) => Some(Delivery::Message(msg)),
            Err(broadcast::error::RecvError::Lagged(count)) => {
                warn!(missed = count, "Subscriber lagged");
                Some(Delivery::Lagged(count))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        debug!(remaining = prev.saturating_sub(1), "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::with_capacity(capacity))
}
