//! Docking work items, results and the approvals that carry them
//!
//! The docking computation itself happens off-chain; this core only sees
//! its hash-bound output.

use super::Timestamp;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A unit of verifiable work assigned to a checkpoint batch.
///
/// Immutable once placed into a checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingJob {
    pub job_id: String,
    /// Protein target, e.g. "6LU7"
    pub target_id: String,
    pub ligand_id: String,
    /// SHA-256 of the ligand input file
    pub ligand_hash: String,
    /// Deterministic seed for the docking run
    pub seed: u32,
    pub assigned: bool,
}

/// Verifiable output of one docking job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingResult {
    pub job_id: String,
    /// Binding affinity as a fixed-precision decimal string
    pub affinity: String,
    pub pose_hash: String,
    pub admet_hash: String,
    /// `compute_result_hash` over the four fields above
    pub result_hash: String,
}

impl DockingResult {
    /// Build a result whose `result_hash` is computed from its fields.
    pub fn new(
        job_id: impl Into<String>,
        affinity: impl Into<String>,
        pose_hash: impl Into<String>,
        admet_hash: impl Into<String>,
    ) -> Self {
        let mut result = Self {
            job_id: job_id.into(),
            affinity: affinity.into(),
            pose_hash: pose_hash.into(),
            admet_hash: admet_hash.into(),
            result_hash: String::new(),
        };
        result.result_hash = compute_result_hash(&result);
        result
    }
}

/// Deterministic result hash: hex SHA-256 of `job|affinity|pose|admet`.
///
/// Field order is significant. The declared `result_hash` is not an input.
pub fn compute_result_hash(result: &DockingResult) -> String {
    let data = format!(
        "{}|{}|{}|{}",
        result.job_id, result.affinity, result.pose_hash, result.admet_hash
    );
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// A miner's signed approval of one checkpoint snapshot.
///
/// Created once per (miner, checkpoint), never mutated, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerApproval {
    pub miner_address: String,
    /// Must equal the checkpoint's deterministic hash at submission time
    pub checkpoint_hash: String,
    pub docking_result: DockingResult,
    /// Verified by the signing layer before the approval reaches this core
    pub signature: String,
    pub timestamp: Timestamp,
}

impl MinerApproval {
    /// Stateless field checks, run before any ledger lookup.
    pub fn validate_basic(&self) -> Result<(), String> {
        if self.miner_address.is_empty() {
            return Err("miner address cannot be empty".to_string());
        }
        if self.checkpoint_hash.is_empty() {
            return Err("checkpoint hash cannot be empty".to_string());
        }
        Ok(())
    }
}
