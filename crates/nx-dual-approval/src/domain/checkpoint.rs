//! Checkpoint entity
//!
//! A checkpoint anchors a batch of docking jobs at a block height. Miners
//! approve it by recomputing one of the jobs; once the quorum rule holds
//! it becomes irreversible.

use super::docking::{DockingJob, MinerApproval};
use super::quorum::QuorumPolicy;
use super::Timestamp;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Checkpoint lifecycle status
///
/// State progression: Pending → Finalized, or Pending → Expired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckpointStatus {
    /// Open for miner approvals
    #[default]
    Pending,
    /// Reserved. No transition produces it.
    Approved,
    /// Quorum reached, irreversible
    Finalized,
    /// Expiry window elapsed without quorum
    Expired,
}

impl CheckpointStatus {
    /// Finalized and Expired accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Finalized => "finalized",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finality candidate anchored at a block height
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Block height, unique key
    pub height: u64,
    pub block_hash: String,
    pub validator_set_hash: String,
    pub status: CheckpointStatus,
    pub created_at: Timestamp,
    pub finalized_at: Option<Timestamp>,
    /// Work batch assigned at creation, fixed afterwards
    pub docking_jobs: Vec<DockingJob>,
    /// Accepted approvals in submission order, at most one per miner
    pub miner_approvals: Vec<MinerApproval>,
}

impl Checkpoint {
    /// Create a new pending checkpoint with no approvals
    pub fn new(
        height: u64,
        block_hash: impl Into<String>,
        validator_set_hash: impl Into<String>,
        docking_jobs: Vec<DockingJob>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            height,
            block_hash: block_hash.into(),
            validator_set_hash: validator_set_hash.into(),
            status: CheckpointStatus::Pending,
            created_at,
            finalized_at: None,
            docking_jobs,
            miner_approvals: Vec::new(),
        }
    }

    /// Deterministic snapshot hash that approvals must echo back.
    ///
    /// Hex SHA-256 of `height|block_hash|validator_set_hash|job_count`.
    /// Approvals are not part of the preimage, so the hash is stable for
    /// the whole pending lifetime.
    pub fn compute_hash(&self) -> String {
        let data = format!(
            "{}|{}|{}|{}",
            self.height,
            self.block_hash,
            self.validator_set_hash,
            self.docking_jobs.len()
        );
        hex::encode(Sha256::digest(data.as_bytes()))
    }

    pub fn is_pending(&self) -> bool {
        self.status == CheckpointStatus::Pending
    }

    pub fn is_finalized(&self) -> bool {
        self.status == CheckpointStatus::Finalized
    }

    pub fn approval_count(&self) -> usize {
        self.miner_approvals.len()
    }

    pub fn has_approval_from(&self, miner_address: &str) -> bool {
        self.miner_approvals
            .iter()
            .any(|a| a.miner_address == miner_address)
    }

    /// Look up a job of this checkpoint's batch by id
    pub fn job(&self, job_id: &str) -> Option<&DockingJob> {
        self.docking_jobs.iter().find(|j| j.job_id == job_id)
    }

    /// Integer-truncated share of `total_miners` that approved. Zero when
    /// no miners are known.
    pub fn approval_percentage(&self, total_miners: u64) -> u64 {
        QuorumPolicy::approval_percentage(self.approval_count(), total_miners)
    }

    pub fn can_finalize(&self, policy: &QuorumPolicy, total_miners: u64) -> bool {
        policy.can_finalize(self.approval_count(), total_miners)
    }

    /// Mark finalized. Returns false if the checkpoint was not pending.
    pub fn finalize(&mut self, now: Timestamp) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = CheckpointStatus::Finalized;
        self.finalized_at = Some(now);
        true
    }

    /// Mark expired. Returns false if the checkpoint was not pending.
    pub fn expire(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = CheckpointStatus::Expired;
        true
    }

    /// True once `current_height` is strictly past the expiry window.
    pub fn is_past_window(&self, current_height: u64, expiry_window: u64) -> bool {
        current_height.saturating_sub(self.height) > expiry_window
    }
}
