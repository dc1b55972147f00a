//! # Nexus Node Runtime
//!
//! Hosts the dual-approval checkpoint machine.
//!
//! ## Modular Structure
//!
//! - `container/` - Component wiring and node configuration
//! - `adapters/` - Storage backends (in-memory, RocksDB)
//! - `handlers/` - Bus handlers feeding the period trigger
//!
//! ## Flow
//!
//! ```text
//! Validator layer ──EndOfBlock──→ Event Bus ──→ EndBlockHandler
//!                                                     │
//!                                                     ↓
//!                                              PeriodTrigger
//!                                                     │
//!                                                     ↓
//!       miners ──MinerApproval──→ CheckpointManager ──→ checkpoint_* events
//! ```

pub mod adapters;
pub mod container;
pub mod handlers;

pub use container::{ContainerError, DualApprovalContainer, NodeConfig};
pub use handlers::EndBlockHandler;
