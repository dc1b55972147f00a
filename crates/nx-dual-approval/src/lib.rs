//! # nx-dual-approval
//!
//! Dual-approval checkpoint finality: validators produce blocks, miners
//! make them irreversible.
//!
//! ## Overview
//!
//! Every `checkpoint_interval` blocks a checkpoint is opened with a batch of
//! docking jobs. Registered miners recompute one of the jobs and submit an
//! approval bound to the checkpoint's snapshot hash. The checkpoint
//! finalizes once both quorum floors hold:
//!
//! - at least `min_checkpoint_signers` approvals, and
//! - at least `checkpoint_threshold_percent` of all known miners.
//!
//! A checkpoint still pending `expiry_window` blocks after its height
//! expires. A miner whose docking result fails verification is slashed.
//!
//! ## Architecture
//!
//! ```text
//! EndOfBlock ──→ PeriodTrigger ──→ CheckpointManager ──→ ApprovalLedger
//!                                     │        │
//!                     MinerApproval ──┘        └──→ MinerRegistry
//!                                     │
//!                                     └──→ checkpoint_* / miner_* events
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use nx_dual_approval::*;
//!
//! let ledger = Arc::new(RwLock::new(KvLedger::new(InMemoryKVStore::new())));
//! let registry = Arc::new(MinerRegistry::new(config, ledger, clock, bus));
//! let manager = Arc::new(CheckpointManager::new(registry.clone(), queue));
//! let trigger = PeriodTrigger::new(manager.clone(), 200);
//!
//! registry.register_miner("nexus1miner", "pubkey").await?;
//! trigger.on_end_block(200, &block_hash, &valset_hash).await?;
//! manager.submit_miner_approval(approval).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryKVStore, InMemoryWorkQueue, KvLedger, ManualClock, SystemTimeSource};
pub use config::DualApprovalConfig;
pub use domain::{
    compute_result_hash, verify_docking_result, Checkpoint, CheckpointStatus, DockingJob,
    DockingResult, Miner, MinerApproval, QuorumPolicy, Timestamp,
};
pub use error::{
    ConfigError, DualApprovalError, DualApprovalResult, KVStoreError, VerificationError,
};
pub use ports::inbound::{ApprovalReceipt, CheckpointApi, MinerRegistryApi, TickOutcome};
pub use ports::outbound::{
    ApprovalLedger, BatchOperation, KeyValueStore, LedgerBatch, LedgerWrite, ScanResult,
    TimeSource, WorkQueue,
};
pub use service::{CheckpointManager, MinerRegistry, PeriodTrigger, SLASH_REASON_INVALID_RESULT};
