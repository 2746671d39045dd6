//! # Broadcast Event Bus
//!
//! In-memory publisher backed by `tokio::sync::broadcast`.
//! Suitable for single-process operation; slow subscribers lag and drop
//! the oldest events rather than blocking the gate.

use crate::events::EventEnvelope;
use crate::ports::outbound::EventPublisher;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::trace;

/// Default channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Multi-consumer event bus.
#[derive(Debug)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<EventEnvelope>,
    events_published: AtomicU64,
}

impl BroadcastEventBus {
    /// Creates a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bus with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Receives every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Current subscriber count.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, envelope: EventEnvelope) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        let topic = envelope.event.topic();
        // No subscribers is not an error
        let delivered = self.sender.send(envelope).unwrap_or(0);
        trace!(topic, delivered, "Event published");
        delivered
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
