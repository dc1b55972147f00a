//! Result verifier
//!
//! Checks the internal consistency of one docking result against the
//! checkpoint batch. It does not re-run the docking computation.

use super::checkpoint::Checkpoint;
use super::docking::{compute_result_hash, DockingResult};
use crate::error::VerificationError;

/// Verify that `result` belongs to `checkpoint`'s batch and that its
/// declared hash matches its own fields.
pub fn verify_docking_result(
    result: &DockingResult,
    checkpoint: &Checkpoint,
) -> Result<(), VerificationError> {
    if checkpoint.job(&result.job_id).is_none() {
        return Err(VerificationError::JobNotInCheckpoint {
            job_id: result.job_id.clone(),
        });
    }

    let expected = compute_result_hash(result);
    if expected != result.result_hash {
        return Err(VerificationError::ResultHashMismatch {
            expected,
            actual: result.result_hash.clone(),
        });
    }

    Ok(())
}
