//! # Subscriptions
//!
//! Receiving side of the bus. A subscription sees every event published
//! after it was created, narrowed to the topics of its filter.
//!
//! A subscriber that falls more than the channel capacity behind loses the
//! oldest events. For the end-of-block handler this means skipped ticks, so
//! the loss is logged and counted rather than hidden.

use crate::events::{BlockchainEvent, EventFilter};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher handle was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Filtered receiver handle. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<BlockchainEvent>,
    filter: EventFilter,
    /// Events overwritten before this subscriber read them
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<BlockchainEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
        }
    }

    /// Wait for the next event matching the filter.
    ///
    /// Returns `None` once the bus has been dropped. Cancel-safe: dropping
    /// the future never loses a matching event.
    pub async fn recv(&mut self) -> Option<BlockchainEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<BlockchainEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Total events this subscriber lost to lag.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    fn record_lag(&mut self, count: u64) {
        self.missed += count;
        warn!(
            topics = ?self.filter.topics,
            lagged = count,
            missed_total = self.missed,
            "Subscriber lagged, events dropped"
        );
    }
}
