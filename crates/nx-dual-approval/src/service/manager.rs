//! Checkpoint manager
//!
//! Owns the checkpoint and approval lifecycle:
//!
//! ```text
//! create ──→ [PENDING] ──quorum──→ [FINALIZED]
//!                │
//!                └──window elapsed──→ [EXPIRED]
//! ```
//!
//! Every mutating operation runs its full read-validate-commit sequence
//! under the ledger write lock. Events are collected while the lock is
//! held and published after it is released.

use super::publish_all;
use super::registry::MinerRegistry;
use crate::config::DualApprovalConfig;
use crate::domain::{verify_docking_result, Checkpoint, MinerApproval, QuorumPolicy};
use crate::error::{DualApprovalError, DualApprovalResult};
use crate::metrics;
use crate::ports::inbound::{ApprovalReceipt, CheckpointApi};
use crate::ports::outbound::{ApprovalLedger, LedgerBatch, TimeSource, WorkQueue};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{BlockchainEvent, EventPublisher};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Slash reason recorded when a docking result fails verification
pub const SLASH_REASON_INVALID_RESULT: &str = "invalid_docking_result";

pub struct CheckpointManager<L, T, Q>
where
    L: ApprovalLedger,
    T: TimeSource,
    Q: WorkQueue,
{
    config: DualApprovalConfig,
    quorum: QuorumPolicy,
    ledger: Arc<RwLock<L>>,
    clock: Arc<T>,
    registry: Arc<MinerRegistry<L, T>>,
    work_queue: Arc<Q>,
    publisher: Arc<dyn EventPublisher>,
}

impl<L, T, Q> CheckpointManager<L, T, Q>
where
    L: ApprovalLedger,
    T: TimeSource,
    Q: WorkQueue,
{
    /// Build a manager sharing the registry's ledger, clock and bus.
    pub fn new(registry: Arc<MinerRegistry<L, T>>, work_queue: Arc<Q>) -> Self {
        let config = registry.config().clone();
        Self {
            quorum: config.quorum(),
            config,
            ledger: registry.ledger(),
            clock: registry.clock(),
            publisher: registry.publisher(),
            registry,
            work_queue,
        }
    }

    pub fn config(&self) -> &DualApprovalConfig {
        &self.config
    }

    pub fn quorum(&self) -> QuorumPolicy {
        self.quorum
    }

    /// Write a new checkpoint with a fresh job batch, moving the pending
    /// pointer to it in the same commit when `make_pending` is set.
    async fn store_checkpoint(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
        make_pending: bool,
    ) -> DualApprovalResult<Checkpoint> {
        let checkpoint = {
            let mut ledger = self.ledger.write();
            if ledger.has_checkpoint(height)? {
                return Err(DualApprovalError::AlreadyExists { height });
            }

            let jobs = self.work_queue.take_pending(self.config.jobs_per_checkpoint);
            let checkpoint = Checkpoint::new(
                height,
                block_hash,
                validator_set_hash,
                jobs,
                self.clock.now(),
            );
            let mut batch = LedgerBatch::new().put_checkpoint(checkpoint.clone());
            if make_pending {
                batch = batch.set_pending_height(height);
            }
            ledger.commit(batch)?;
            checkpoint
        };

        metrics::record_checkpoint_created();
        info!(
            height,
            jobs = checkpoint.docking_jobs.len(),
            pending = make_pending,
            "[dual-approval] Checkpoint created"
        );

        publish_all(
            self.publisher.as_ref(),
            vec![BlockchainEvent::CheckpointCreated {
                height,
                block_hash: checkpoint.block_hash.clone(),
                job_count: checkpoint.docking_jobs.len(),
            }],
        )
        .await;
        Ok(checkpoint)
    }

    /// Validation pipeline of an approval. Runs with the write lock held.
    fn apply_approval(
        &self,
        ledger: &mut L,
        approval: &MinerApproval,
        events: &mut Vec<BlockchainEvent>,
    ) -> DualApprovalResult<ApprovalReceipt> {
        let address = approval.miner_address.as_str();

        let mut miner = ledger
            .miner(address)?
            .ok_or_else(|| DualApprovalError::MinerNotRegistered {
                address: address.to_string(),
            })?;

        if !miner.can_participate(self.config.min_participation_reputation) {
            return Err(DualApprovalError::MinerNotEligible {
                address: address.to_string(),
                reputation: miner.reputation,
                slashed: miner.slashed,
            });
        }

        let height = ledger
            .pending_height()?
            .ok_or(DualApprovalError::NoPendingCheckpoint)?;
        let mut checkpoint = ledger
            .checkpoint(height)?
            .ok_or(DualApprovalError::CheckpointNotFound { height })?;

        if !checkpoint.is_pending() {
            return Err(DualApprovalError::CheckpointNotPending {
                height,
                status: checkpoint.status,
            });
        }

        let expected = checkpoint.compute_hash();
        if expected != approval.checkpoint_hash {
            return Err(DualApprovalError::CheckpointHashMismatch {
                expected,
                actual: approval.checkpoint_hash.clone(),
            });
        }

        if let Err(e) = verify_docking_result(&approval.docking_result, &checkpoint) {
            if let Some((_, event)) =
                self.registry
                    .slash_locked(ledger, address, SLASH_REASON_INVALID_RESULT)?
            {
                events.push(event);
            }
            return Err(e.into());
        }

        if checkpoint.has_approval_from(address) {
            return Err(DualApprovalError::DuplicateApproval {
                address: address.to_string(),
                height,
            });
        }

        let now = self.clock.now();
        checkpoint.miner_approvals.push(approval.clone());
        miner.record_approval(
            self.config.approval_reward,
            self.config.max_reputation,
            now,
        );

        let total_miners = ledger.miner_count()?;
        let finalized =
            checkpoint.can_finalize(&self.quorum, total_miners) && checkpoint.finalize(now);
        let total_approvals = checkpoint.approval_count();

        let mut batch = LedgerBatch::new().put_miner(miner);
        if finalized {
            batch = batch.set_latest_height(height);
        }
        let block_hash = checkpoint.block_hash.clone();
        ledger.commit(batch.put_checkpoint(checkpoint))?;

        debug!(
            miner = %address,
            height,
            approvals = total_approvals,
            total_miners,
            "[dual-approval] Approval accepted"
        );
        events.push(BlockchainEvent::MinerApproval {
            miner: address.to_string(),
            checkpoint_height: height,
            total_approvals,
        });

        if finalized {
            info!(
                height,
                approvals = total_approvals,
                total_miners,
                "[dual-approval] Checkpoint finalized"
            );
            events.push(BlockchainEvent::CheckpointFinalized {
                height,
                approvals: total_approvals,
                block_hash,
            });
        }

        Ok(ApprovalReceipt {
            checkpoint_height: height,
            total_approvals,
            finalized,
        })
    }
}

#[async_trait]
impl<L, T, Q> CheckpointApi for CheckpointManager<L, T, Q>
where
    L: ApprovalLedger + 'static,
    T: TimeSource + 'static,
    Q: WorkQueue + 'static,
{
    async fn create_checkpoint(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
    ) -> DualApprovalResult<Checkpoint> {
        self.store_checkpoint(height, block_hash, validator_set_hash, false)
            .await
    }

    async fn open_checkpoint(
        &self,
        height: u64,
        block_hash: &str,
        validator_set_hash: &str,
    ) -> DualApprovalResult<Checkpoint> {
        self.store_checkpoint(height, block_hash, validator_set_hash, true)
            .await
    }

    async fn mark_pending(&self, height: u64) -> DualApprovalResult<()> {
        let mut ledger = self.ledger.write();
        if !ledger.has_checkpoint(height)? {
            return Err(DualApprovalError::CheckpointNotFound { height });
        }
        ledger.commit(LedgerBatch::new().set_pending_height(height))?;
        debug!(height, "[dual-approval] Pending checkpoint moved");
        Ok(())
    }

    async fn submit_miner_approval(
        &self,
        approval: MinerApproval,
    ) -> DualApprovalResult<ApprovalReceipt> {
        let mut events = Vec::new();
        let result = match approval.validate_basic() {
            Ok(()) => {
                let mut ledger = self.ledger.write();
                self.apply_approval(&mut ledger, &approval, &mut events)
            }
            Err(reason) => Err(DualApprovalError::InvalidRequest { reason }),
        };

        match &result {
            Ok(receipt) => {
                metrics::record_approval_accepted();
                if receipt.finalized {
                    metrics::record_checkpoint_finalized();
                }
            }
            Err(e) => {
                metrics::record_approval_rejected(e.label());
                warn!(
                    miner = %approval.miner_address,
                    error = %e,
                    "[dual-approval] Approval rejected"
                );
            }
        }

        publish_all(self.publisher.as_ref(), events).await;
        result
    }

    async fn expire_stale(&self, current_height: u64) -> DualApprovalResult<Option<u64>> {
        let height = {
            let mut ledger = self.ledger.write();
            let Some(height) = ledger.pending_height()? else {
                return Ok(None);
            };
            let Some(mut checkpoint) = ledger.checkpoint(height)? else {
                return Ok(None);
            };
            if !checkpoint.is_past_window(current_height, self.config.expiry_window)
                || !checkpoint.expire()
            {
                return Ok(None);
            }
            ledger.commit(LedgerBatch::new().put_checkpoint(checkpoint))?;
            height
        };

        metrics::record_checkpoint_expired();
        info!(
            height,
            current_height,
            "[dual-approval] Checkpoint expired without quorum"
        );

        publish_all(
            self.publisher.as_ref(),
            vec![BlockchainEvent::CheckpointExpired { height }],
        )
        .await;
        Ok(Some(height))
    }

    async fn get_checkpoint(&self, height: u64) -> DualApprovalResult<Checkpoint> {
        self.ledger
            .read()
            .checkpoint(height)?
            .ok_or(DualApprovalError::CheckpointNotFound { height })
    }

    async fn get_pending_checkpoint(&self) -> DualApprovalResult<Option<Checkpoint>> {
        let ledger = self.ledger.read();
        match ledger.pending_height()? {
            Some(height) => ledger.checkpoint(height),
            None => Ok(None),
        }
    }

    async fn get_latest_checkpoint(&self) -> DualApprovalResult<Option<Checkpoint>> {
        let ledger = self.ledger.read();
        match ledger.latest_height()? {
            Some(height) => ledger.checkpoint(height),
            None => Ok(None),
        }
    }

    async fn list_checkpoints(&self) -> DualApprovalResult<Vec<Checkpoint>> {
        self.ledger.read().list_checkpoints()
    }
}
