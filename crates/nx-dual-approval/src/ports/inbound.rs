//! Driving Ports (API - Inbound)

use crate::domain::{Checkpoint, Miner, MinerApproval};
use crate::error::DualApprovalResult;
use async_trait::async_trait;

/// Outcome of an accepted approval
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalReceipt {
    pub checkpoint_height: u64,
    /// Approvals on the checkpoint including this one
    pub total_approvals: usize,
    /// Whether this approval completed the quorum
    pub finalized: bool,
}

/// What a single end-of-block tick did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Height of the checkpoint opened on this tick
    pub created: Option<u64>,
    /// Height of the checkpoint expired on this tick
    pub expired: Option<u64>,
}

impl TickOutcome {
    pub fn is_noop(&self) -> bool {
        self.created.is_none() && self.expired.is_none()
    }
}

/// Miner registry API
#[async_trait]
pub trait MinerRegistryApi: Send + Sync {
    /// Register a new miner with the initial reputation.
    async fn register_miner(&self, address: &str, public_key: &str) -> DualApprovalResult<Miner>;

    /// Fails with `MinerNotFound` if absent.
    async fn get_miner(&self, address: &str) -> DualApprovalResult<Miner>;

    /// Apply the slash penalty. Returns `None` without error when the
    /// miner is unknown.
    async fn slash_miner(&self, address: &str, reason: &str) -> DualApprovalResult<Option<Miner>>;

    /// Number of miners ever registered. Slashing does not reduce it.
    async fn active_miner_count(&self) -> DualApprovalResult<u64>;

    /// All miners ordered by address
    async fn list_miners(&self) -> DualApprovalResult<Vec<Miner>>;
}

/// Checkpoint lifecycle API
///
/// This is the driving port for the checkpoint manager. The period trigger
/// and RPC-facing hosts talk to the manager only through it.
#[async_trait]
pub trait CheckpointApi: Send + Sync {
    /// Store a pending checkpoint at `height` with a fresh job batch.
    ///
    /// Does not move the pending pointer; see [`CheckpointApi::mark_pending`].
    async fn create_checkpoint(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
    ) -> DualApprovalResult<Checkpoint>;

    /// Store a checkpoint and make it the pending one in a single commit.
    ///
    /// Either both writes land or neither does, so an interrupted caller
    /// never leaves a checkpoint the pointer cannot reach.
    async fn open_checkpoint(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
    ) -> DualApprovalResult<Checkpoint>;

    /// Make `height` the checkpoint that receives approvals.
    async fn mark_pending(&self, height: u64) -> DualApprovalResult<()>;

    /// Validate and record a miner approval, finalizing on quorum.
    async fn submit_miner_approval(
        &self,
        approval: MinerApproval,
    ) -> DualApprovalResult<ApprovalReceipt>;

    /// Expire the pending checkpoint if `current_height` is past its
    /// window. Returns the expired height.
    async fn expire_stale(&self, current_height: u64) -> DualApprovalResult<Option<u64>>;

    /// Fails with `CheckpointNotFound` if absent.
    async fn get_checkpoint(&self, height: u64) -> DualApprovalResult<Checkpoint>;

    /// Checkpoint behind the pending pointer, whatever its status
    async fn get_pending_checkpoint(&self) -> DualApprovalResult<Option<Checkpoint>>;

    /// Most recently finalized checkpoint
    async fn get_latest_checkpoint(&self) -> DualApprovalResult<Option<Checkpoint>>;

    /// All checkpoints ordered by height
    async fn list_checkpoints(&self) -> DualApprovalResult<Vec<Checkpoint>>;
}
