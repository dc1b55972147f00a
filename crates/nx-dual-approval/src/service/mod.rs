//! Dual-approval services
//!
//! - [`MinerRegistry`]: miner identities, reputation and slashing
//! - [`CheckpointManager`]: checkpoint creation, approvals, quorum, expiry
//! - [`PeriodTrigger`]: drives the manager from end-of-block ticks

mod manager;
mod registry;
mod trigger;


pub use manager::{CheckpointManager, SLASH_REASON_INVALID_RESULT};
pub use registry::MinerRegistry;
pub use trigger::PeriodTrigger;

use shared_bus::{BlockchainEvent, EventPublisher};

/// Publish buffered events in order.
async fn publish_all(publisher: &dyn EventPublisher, events: Vec<BlockchainEvent>) {
    for event in events {
        publisher.publish(event).await;
    }
}
