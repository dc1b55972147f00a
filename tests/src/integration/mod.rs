//! # Integration Tests
//!
//! Wire the node container onto the bus and drive it the way the
//! validator layer and the miners do.

pub mod concurrency;
pub mod e2e_checkpoint;

use nx_dual_approval::{Checkpoint, DockingJob, DockingResult, MinerApproval, MinerRegistryApi};
use node_runtime::DualApprovalContainer;

pub(crate) fn job(n: u32) -> DockingJob {
    DockingJob {
        job_id: format!("job-{n}"),
        target_id: "6LU7".into(),
        ligand_id: format!("lig-{n}"),
        ligand_hash: format!("ligand-hash-{n}"),
        seed: n,
        assigned: false,
    }
}

/// Approval carrying a correctly hashed result for the first batch job.
pub(crate) fn approval_for(checkpoint: &Checkpoint, miner: &str) -> MinerApproval {
    MinerApproval {
        miner_address: miner.to_string(),
        checkpoint_hash: checkpoint.compute_hash(),
        docking_result: DockingResult::new(
            checkpoint.docking_jobs[0].job_id.clone(),
            "-8.105",
            format!("pose-{miner}"),
            "admet",
        ),
        signature: format!("sig-{miner}"),
        timestamp: 0,
    }
}

pub(crate) async fn register_miners(container: &DualApprovalContainer, n: usize) -> Vec<String> {
    let mut addresses = Vec::with_capacity(n);
    for i in 0..n {
        let address = format!("nexus1miner{i:02}");
        container
            .registry
            .register_miner(&address, &format!("pubkey-{i}"))
            .await
            .unwrap();
        addresses.push(address);
    }
    addresses
}
