//! Miner registry
//!
//! Sole owner of miner records and the registration counter.

use super::publish_all;
use crate::config::DualApprovalConfig;
use crate::domain::Miner;
use crate::error::{DualApprovalError, DualApprovalResult};
use crate::metrics;
use crate::ports::inbound::MinerRegistryApi;
use crate::ports::outbound::{ApprovalLedger, LedgerBatch, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{BlockchainEvent, EventPublisher};
use std::sync::Arc;
use tracing::{info, warn};

pub struct MinerRegistry<L, T>
where
    L: ApprovalLedger,
    T: TimeSource,
{
    config: DualApprovalConfig,
    ledger: Arc<RwLock<L>>,
    clock: Arc<T>,
    publisher: Arc<dyn EventPublisher>,
}

impl<L, T> MinerRegistry<L, T>
where
    L: ApprovalLedger,
    T: TimeSource,
{
    pub fn new(
        config: DualApprovalConfig,
        ledger: Arc<RwLock<L>>,
        clock: Arc<T>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            ledger,
            clock,
            publisher,
        }
    }

    pub fn config(&self) -> &DualApprovalConfig {
        &self.config
    }

    pub(crate) fn ledger(&self) -> Arc<RwLock<L>> {
        Arc::clone(&self.ledger)
    }

    pub(crate) fn clock(&self) -> Arc<T> {
        Arc::clone(&self.clock)
    }

    pub(crate) fn publisher(&self) -> Arc<dyn EventPublisher> {
        Arc::clone(&self.publisher)
    }

    /// Slash `address` inside a ledger section the caller already holds.
    ///
    /// Returns the updated miner and the event to publish once the lock is
    /// released, or `None` if the miner is unknown.
    pub(crate) fn slash_locked(
        &self,
        ledger: &mut L,
        address: &str,
        reason: &str,
    ) -> DualApprovalResult<Option<(Miner, BlockchainEvent)>> {
        let Some(mut miner) = ledger.miner(address)? else {
            return Ok(None);
        };

        miner.apply_slash(self.config.slash_penalty);
        ledger.commit(LedgerBatch::new().put_miner(miner.clone()))?;

        metrics::record_miner_slashed();
        warn!(
            miner = %address,
            reason,
            reputation = miner.reputation,
            slashed = miner.slashed,
            "[dual-approval] Miner slashed"
        );

        let event = BlockchainEvent::MinerSlashed {
            address: address.to_string(),
            reason: reason.to_string(),
            new_reputation: miner.reputation,
        };
        Ok(Some((miner, event)))
    }
}

#[async_trait]
impl<L, T> MinerRegistryApi for MinerRegistry<L, T>
where
    L: ApprovalLedger + 'static,
    T: TimeSource + 'static,
{
    async fn register_miner(&self, address: &str, public_key: &str) -> DualApprovalResult<Miner> {
        if address.is_empty() {
            return Err(DualApprovalError::InvalidRequest {
                reason: "miner address cannot be empty".to_string(),
            });
        }

        let (miner, count) = {
            let mut ledger = self.ledger.write();
            if ledger.has_miner(address)? {
                return Err(DualApprovalError::AlreadyRegistered {
                    address: address.to_string(),
                });
            }

            let count = ledger.miner_count()?.saturating_add(1);
            let miner = Miner::new(
                address,
                public_key,
                self.config.initial_reputation,
                self.clock.now(),
            );
            ledger.commit(
                LedgerBatch::new()
                    .put_miner(miner.clone())
                    .set_miner_count(count),
            )?;
            (miner, count)
        };

        metrics::set_registered_miners(count);
        info!(miner = %address, total = count, "[dual-approval] Miner registered");

        publish_all(
            self.publisher.as_ref(),
            vec![BlockchainEvent::MinerRegistered {
                address: address.to_string(),
            }],
        )
        .await;
        Ok(miner)
    }

    async fn get_miner(&self, address: &str) -> DualApprovalResult<Miner> {
        self.ledger
            .read()
            .miner(address)?
            .ok_or_else(|| DualApprovalError::MinerNotFound {
                address: address.to_string(),
            })
    }

    async fn slash_miner(&self, address: &str, reason: &str) -> DualApprovalResult<Option<Miner>> {
        let slashed = {
            let mut ledger = self.ledger.write();
            self.slash_locked(&mut ledger, address, reason)?
        };

        match slashed {
            Some((miner, event)) => {
                publish_all(self.publisher.as_ref(), vec![event]).await;
                Ok(Some(miner))
            }
            None => Ok(None),
        }
    }

    async fn active_miner_count(&self) -> DualApprovalResult<u64> {
        self.ledger.read().miner_count()
    }

    async fn list_miners(&self) -> DualApprovalResult<Vec<Miner>> {
        self.ledger.read().list_miners()
    }
}
