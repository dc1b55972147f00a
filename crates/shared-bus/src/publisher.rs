//! # Event Publisher
//!
//! Publishing side of the bus. The dual-approval services hold it as
//! `Arc<dyn EventPublisher>` and publish only after their ledger commit.

use crate::events::{BlockchainEvent, EventFilter};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Sink for checkpoint, registry and tick events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver `event` to every current subscriber. Returns how many
    /// received it; zero is not an error.
    async fn publish(&self, event: BlockchainEvent) -> usize;

    /// Events attempted so far, including ones nobody received.
    fn events_published(&self) -> u64;
}

/// Broadcast bus shared by the node's components.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<BlockchainEvent>,
    events_published: AtomicU64,
    /// Events a subscriber may fall behind before it starts losing them
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter, starting from the next
    /// published event.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: BlockchainEvent) -> usize {
        let name = event.name();

        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(event = name, receivers = receiver_count, "Event published");
                receiver_count
            }
            Err(e) => {
                warn!(event = name, error = %e, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
