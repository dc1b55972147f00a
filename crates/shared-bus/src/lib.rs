//! # Shared Bus - In-Process Event Bus
//!
//! Carries the external end-of-block tick into the node and the observable
//! side effects of the dual-approval checkpoint machine out of it.
//!
//! ```text
//! ┌───────────────────┐  EndOfBlock   ┌──────────────┐
//! │ Validator layer   │ ────────────→ │              │ ──→ period trigger
//! └───────────────────┘               │  Event Bus   │
//! ┌───────────────────┐  checkpoint_* │              │
//! │ Dual-approval core│ ────────────→ │              │ ──→ indexers, RPC, audit
//! └───────────────────┘  miner_*      └──────────────┘
//! ```
//!
//! Publishers never block: events with no subscriber are counted and dropped.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BlockchainEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
