//! # Bus Events
//!
//! Defines every event that flows through the shared bus: the end-of-block
//! tick delivered by the block-production layer, and the observable side
//! effects of the dual-approval checkpoint machine.
//!
//! Event names returned by [`BlockchainEvent::name`] are stable and form part
//! of the external interface.

use serde::{Deserialize, Serialize};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockchainEvent {
    // =========================================================================
    // BLOCK PRODUCTION (external clock)
    // =========================================================================
    /// A block was committed by the validator layer.
    /// Drives the checkpoint period trigger.
    EndOfBlock {
        /// Committed block height.
        height: u64,
        /// Hex-encoded hash of the committed block.
        block_hash: String,
        /// Hex-encoded hash of the validator set that committed it.
        validator_set_hash: String,
    },

    // =========================================================================
    // CHECKPOINT LIFECYCLE
    // =========================================================================
    /// A checkpoint was opened at a height.
    CheckpointCreated {
        height: u64,
        block_hash: String,
        job_count: usize,
    },

    /// A miner approval was accepted.
    MinerApproval {
        miner: String,
        checkpoint_height: u64,
        total_approvals: usize,
    },

    /// A checkpoint reached quorum and became irreversible.
    CheckpointFinalized {
        height: u64,
        approvals: usize,
        block_hash: String,
    },

    /// A checkpoint stayed pending past the expiry window.
    CheckpointExpired { height: u64 },

    // =========================================================================
    // MINER REGISTRY
    // =========================================================================
    /// A new miner joined.
    MinerRegistered { address: String },

    /// A miner was penalised.
    MinerSlashed {
        address: String,
        reason: String,
        new_reputation: u64,
    },

    // =========================================================================
    // DEAD LETTER QUEUE
    // =========================================================================
    /// A host component failed while handling an event.
    CriticalError {
        /// Component that failed.
        component: String,
        /// Error description.
        error: String,
    },
}

impl BlockchainEvent {
    /// Stable wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::EndOfBlock { .. } => "end_of_block",
            Self::CheckpointCreated { .. } => "checkpoint_created",
            Self::MinerApproval { .. } => "miner_approval",
            Self::CheckpointFinalized { .. } => "checkpoint_finalized",
            Self::CheckpointExpired { .. } => "checkpoint_expired",
            Self::MinerRegistered { .. } => "miner_registered",
            Self::MinerSlashed { .. } => "miner_slashed",
            Self::CriticalError { .. } => "critical_error",
        }
    }

    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::EndOfBlock { .. } => EventTopic::BlockProduction,
            Self::CheckpointCreated { .. }
            | Self::MinerApproval { .. }
            | Self::CheckpointFinalized { .. }
            | Self::CheckpointExpired { .. } => EventTopic::Checkpoint,
            Self::MinerRegistered { .. } | Self::MinerSlashed { .. } => EventTopic::MinerRegistry,
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// End-of-block ticks from the validator layer.
    BlockProduction,
    /// Checkpoint lifecycle events.
    Checkpoint,
    /// Miner registration and slashing.
    MinerRegistry,
    /// Dead Letter Queue for critical errors.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &BlockchainEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
