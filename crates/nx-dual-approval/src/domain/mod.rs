//! Domain model for dual-approval finality
//!
//! - checkpoint: finality candidates and their snapshot hash
//! - docking: work items, results and miner approvals
//! - miner: miner identity and reputation rules
//! - quorum: the dual finalization threshold
//! - verifier: docking result consistency check

pub mod checkpoint;
pub mod docking;
pub mod miner;
pub mod quorum;
pub mod verifier;

pub use checkpoint::{Checkpoint, CheckpointStatus};
pub use docking::{compute_result_hash, DockingJob, DockingResult, MinerApproval};
pub use miner::Miner;
pub use quorum::QuorumPolicy;
pub use verifier::verify_docking_result;

/// Unix seconds
pub type Timestamp = u64;
