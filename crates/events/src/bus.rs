//! Broadcast bus carrying feature lifecycle, board and audio events

use tokio::sync::broadcast;

use crate::types::{Event, EventEnvelope};

/// Slow subscribers lag once this many events are queued
const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes to every current subscriber.
    ///
    /// Returns how many subscribers received the envelope; with none the
    /// event is dropped.
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Wraps `event` in a fresh envelope and publishes it
    pub fn emit(&self, event: Event) -> usize {
        self.publish(EventEnvelope::new(event))
    }

    /// Events published before this call are not replayed
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
