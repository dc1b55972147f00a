//! Period trigger (end-of-block hook)
//!
//! Opens a checkpoint at every multiple of the checkpoint interval and
//! sweeps the pending checkpoint for expiry on every tick.

use crate::error::DualApprovalResult;
use crate::ports::inbound::{CheckpointApi, TickOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PeriodTrigger<C: CheckpointApi> {
    manager: Arc<C>,
    checkpoint_interval: u64,
}

impl<C: CheckpointApi> PeriodTrigger<C> {
    pub fn new(manager: Arc<C>, checkpoint_interval: u64) -> Self {
        Self {
            manager,
            checkpoint_interval,
        }
    }

    pub fn manager(&self) -> &Arc<C> {
        &self.manager
    }

    /// Height 0 never opens a checkpoint.
    pub fn is_checkpoint_height(&self, height: u64) -> bool {
        height > 0 && self.checkpoint_interval > 0 && height % self.checkpoint_interval == 0
    }

    /// Handle one end-of-block tick.
    ///
    /// A failed creation is logged and leaves the pending pointer where it
    /// was. Storage failures during expiry are returned.
    pub async fn on_end_block(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
    ) -> DualApprovalResult<TickOutcome> {
        let mut outcome = TickOutcome::default();

        if self.is_checkpoint_height(height) {
            match self
                .manager
                .open_checkpoint(height, block_hash, validator_set_hash)
                .await
            {
                Ok(checkpoint) => outcome.created = Some(checkpoint.height),
                Err(e) => {
                    warn!(height, error = %e, "[dual-approval] Failed to create checkpoint");
                }
            }
        }

        outcome.expired = self.manager.expire_stale(height).await?;

        if !outcome.is_noop() {
            debug!(height, ?outcome, "[dual-approval] End-of-block tick");
        }
        Ok(outcome)
    }
}
