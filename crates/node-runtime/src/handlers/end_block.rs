//! # End-of-Block Handler
//!
//! Feeds `EndOfBlock` ticks from the validator layer into the period
//! trigger.
//!
//! ## Flow
//!
//! 1. Validator layer commits a block and publishes `EndOfBlock`
//! 2. Handler forwards the tick to `PeriodTrigger::on_end_block`
//! 3. A tick that fails with a storage error is reported as `CriticalError`
//!    on the dead letter queue; the loop keeps running

use std::sync::Arc;

use nx_dual_approval::{CheckpointApi, PeriodTrigger, TickOutcome};
use nx_telemetry::{log_block_event, log_event};
use shared_bus::{BlockchainEvent, EventPublisher, Subscription};
use tokio::sync::watch;

const SUBSYSTEM: &str = "dual-approval";

/// Handler for end-of-block ticks.
pub struct EndBlockHandler<C: CheckpointApi> {
    trigger: Arc<PeriodTrigger<C>>,
    /// Destination for `CriticalError` reports.
    publisher: Arc<dyn EventPublisher>,
}

impl<C: CheckpointApi> EndBlockHandler<C> {
    pub fn new(trigger: Arc<PeriodTrigger<C>>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { trigger, publisher }
    }

    /// Process one bus event.
    ///
    /// Returns `None` for events other than `EndOfBlock` and for ticks that
    /// failed.
    pub async fn handle(&self, event: &BlockchainEvent) -> Option<TickOutcome> {
        let BlockchainEvent::EndOfBlock {
            height,
            block_hash,
            validator_set_hash,
        } = event
        else {
            return None;
        };

        match self
            .trigger
            .on_end_block(*height, block_hash, validator_set_hash)
            .await
        {
            Ok(outcome) => {
                if let Some(created) = outcome.created {
                    log_block_event!(info, SUBSYSTEM, "Checkpoint opened", created, block_hash);
                }
                if let Some(expired) = outcome.expired {
                    log_event!(warn, SUBSYSTEM, "Checkpoint expired", height = expired);
                }
                Some(outcome)
            }
            Err(e) => {
                log_block_event!(
                    error,
                    SUBSYSTEM,
                    "End-of-block tick failed",
                    *height,
                    block_hash,
                    error = %e
                );
                self.publisher
                    .publish(BlockchainEvent::CriticalError {
                        component: SUBSYSTEM.to_string(),
                        error: e.to_string(),
                    })
                    .await;
                None
            }
        }
    }

    /// Run the handler loop until the bus closes or `shutdown` flips to
    /// true (or its sender is dropped).
    ///
    /// Shutdown is only observed between events; a tick that has started
    /// always runs to completion.
    pub async fn run(self, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        log_event!(info, SUBSYSTEM, "End-of-block handler started");

        loop {
            let event = tokio::select! {
                event = subscription.recv() => event,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        log_event!(info, SUBSYSTEM, "Shutdown signal received");
                        return;
                    }
                    continue;
                }
            };

            match event {
                Some(event) => {
                    self.handle(&event).await;
                }
                None => {
                    log_event!(info, SUBSYSTEM, "Channel closed, exiting");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{DualApprovalContainer, NodeConfig};
    use nx_dual_approval::{
        BatchOperation, CheckpointManager, InMemoryWorkQueue, KVStoreError, KeyValueStore,
        KvLedger, ManualClock, MinerRegistry, ScanResult,
    };
    use parking_lot::RwLock;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use std::time::Duration;

    fn end_of_block(height: u64) -> BlockchainEvent {
        BlockchainEvent::EndOfBlock {
            height,
            block_hash: format!("block-{height}"),
            validator_set_hash: "valset".into(),
        }
    }

    /// Store whose every operation fails with an I/O error.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }

        fn put(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }

        fn delete(&mut self, _key: &[u8]) -> Result<(), KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }

        fn atomic_batch_write(&mut self, _ops: Vec<BatchOperation>) -> Result<(), KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }

        fn exists(&self, _key: &[u8]) -> Result<bool, KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }

        fn prefix_scan(&self, _prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
            Err(KVStoreError::IOError {
                message: "disk offline".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_checkpoint_height_opens_checkpoint() {
        let container = DualApprovalContainer::new(NodeConfig::default()).unwrap();
        let handler = EndBlockHandler::new(container.trigger.clone(), container.bus.clone());

        let outcome = handler.handle(&end_of_block(199)).await.unwrap();
        assert!(outcome.is_noop());

        let outcome = handler.handle(&end_of_block(200)).await.unwrap();
        assert_eq!(outcome.created, Some(200));

        let pending = container.manager.get_pending_checkpoint().await.unwrap();
        assert_eq!(pending.map(|c| c.block_hash), Some("block-200".to_string()));
    }

    #[tokio::test]
    async fn test_other_events_ignored() {
        let container = DualApprovalContainer::new(NodeConfig::default()).unwrap();
        let handler = EndBlockHandler::new(container.trigger.clone(), container.bus.clone());

        let event = BlockchainEvent::CheckpointExpired { height: 200 };
        assert!(handler.handle(&event).await.is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_reported_to_dead_letter_queue() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut dlq = bus.subscribe(EventFilter::topics(vec![EventTopic::DeadLetterQueue]));

        let ledger = Arc::new(RwLock::new(KvLedger::new(FailingStore)));
        let registry = Arc::new(MinerRegistry::new(
            Default::default(),
            ledger,
            Arc::new(ManualClock::new(0)),
            bus.clone(),
        ));
        let manager = Arc::new(CheckpointManager::new(
            registry,
            Arc::new(InMemoryWorkQueue::new()),
        ));
        let trigger = Arc::new(PeriodTrigger::new(manager, 200));
        let handler = EndBlockHandler::new(trigger, bus.clone());

        assert!(handler.handle(&end_of_block(200)).await.is_none());

        match dlq.try_recv().unwrap() {
            Some(BlockchainEvent::CriticalError { component, error }) => {
                assert_eq!(component, "dual-approval");
                assert!(error.contains("disk offline"));
            }
            other => panic!("expected CriticalError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_drives_trigger_from_bus() {
        let container = DualApprovalContainer::new(NodeConfig::default()).unwrap();
        let subscription = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BlockProduction]));
        let mut checkpoints = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Checkpoint]));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handler = EndBlockHandler::new(container.trigger.clone(), container.bus.clone());
        let task = tokio::spawn(handler.run(subscription, shutdown_rx));

        container.bus.publish(end_of_block(200)).await;

        let event = tokio::time::timeout(Duration::from_secs(5), checkpoints.recv())
            .await
            .unwrap();
        assert!(matches!(
            event,
            Some(BlockchainEvent::CheckpointCreated { height: 200, .. })
        ));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_leaves_ledger_consistent() {
        let container = DualApprovalContainer::new(NodeConfig::default()).unwrap();
        let subscription = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BlockProduction]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Shutdown and a tick are both ready when the loop starts
        shutdown_tx.send(true).unwrap();
        container.bus.publish(end_of_block(200)).await;

        let handler = EndBlockHandler::new(container.trigger.clone(), container.bus.clone());
        let task = tokio::spawn(handler.run(subscription, shutdown_rx));
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();

        // Whatever the select picked, the ledger is consistent: either the
        // checkpoint is absent or it is reachable through the pointer
        let stored = container.manager.list_checkpoints().await.unwrap();
        let pending = container.manager.get_pending_checkpoint().await.unwrap();
        assert_eq!(stored.first(), pending.as_ref());
    }
}
