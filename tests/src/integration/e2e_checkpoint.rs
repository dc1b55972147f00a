//! # End-to-End Checkpoint Flow
//!
//! ```text
//! EndOfBlock(200) ──→ EndBlockHandler ──→ PeriodTrigger ──→ CheckpointCreated
//!                                                                 │
//!                miners ──MinerApproval × 5──→ CheckpointManager ─┘
//!                                                   │
//!                                                   ↓
//!                                           CheckpointFinalized
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::time::timeout;

    use node_runtime::{DualApprovalContainer, EndBlockHandler, NodeConfig};
    use nx_dual_approval::{
        Checkpoint, CheckpointApi, CheckpointStatus, DualApprovalError, MinerRegistryApi,
    };
    use shared_bus::{BlockchainEvent, EventFilter, EventPublisher, EventTopic, Subscription};

    use crate::integration::{approval_for, job, register_miners};

    const WAIT: Duration = Duration::from_secs(5);

    fn end_of_block(height: u64) -> BlockchainEvent {
        BlockchainEvent::EndOfBlock {
            height,
            block_hash: format!("block-{height}"),
            validator_set_hash: "valset-1".into(),
        }
    }

    /// Container with a running end-of-block handler and a queue of jobs.
    ///
    /// The handler stops when the returned sender is dropped.
    fn start_node() -> (Arc<DualApprovalContainer>, watch::Sender<bool>) {
        let container = Arc::new(DualApprovalContainer::new(NodeConfig::default()).unwrap());
        container.work_queue.extend((1..=50).map(job));

        let ticks = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BlockProduction]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handler = EndBlockHandler::new(container.trigger.clone(), container.bus.clone());
        tokio::spawn(handler.run(ticks, shutdown_rx));

        (container, shutdown_tx)
    }

    /// Poll until the trigger has moved the pending pointer to `height`.
    async fn pending_at(node: &DualApprovalContainer, height: u64) -> Checkpoint {
        timeout(WAIT, async {
            loop {
                match node.manager.get_pending_checkpoint().await.unwrap() {
                    Some(cp) if cp.height == height => return cp,
                    _ => tokio::task::yield_now().await,
                }
            }
        })
        .await
        .expect("timed out waiting for pending checkpoint")
    }

    /// Wait for the first event matching `pred`.
    async fn wait_for<F>(sub: &mut Subscription, pred: F) -> BlockchainEvent
    where
        F: Fn(&BlockchainEvent) -> bool,
    {
        timeout(WAIT, async {
            loop {
                match sub.recv().await {
                    Some(event) if pred(&event) => return event,
                    Some(_) => continue,
                    None => panic!("bus closed"),
                }
            }
        })
        .await
        .expect("timed out waiting for event")
    }

    #[tokio::test]
    async fn test_checkpoint_finalizes_through_bus() {
        let (node, _shutdown) = start_node();
        let mut checkpoints = node
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Checkpoint]));
        let miners = register_miners(&node, 7).await;

        for height in 198..=200 {
            node.bus.publish(end_of_block(height)).await;
        }

        let created = wait_for(&mut checkpoints, |e| {
            matches!(e, BlockchainEvent::CheckpointCreated { .. })
        })
        .await;
        assert_eq!(
            created,
            BlockchainEvent::CheckpointCreated {
                height: 200,
                block_hash: "block-200".into(),
                job_count: 10,
            }
        );
        let checkpoint = pending_at(&node, 200).await;
        assert_eq!(node.work_queue.len(), 40);
        for (i, miner) in miners.iter().take(5).enumerate() {
            let receipt = node
                .manager
                .submit_miner_approval(approval_for(&checkpoint, miner))
                .await
                .unwrap();
            assert_eq!(receipt.total_approvals, i + 1);
            assert_eq!(receipt.finalized, i == 4);
        }

        let finalized = wait_for(&mut checkpoints, |e| {
            matches!(e, BlockchainEvent::CheckpointFinalized { .. })
        })
        .await;
        assert_eq!(
            finalized,
            BlockchainEvent::CheckpointFinalized {
                height: 200,
                approvals: 5,
                block_hash: "block-200".into(),
            }
        );

        let latest = node.manager.get_latest_checkpoint().await.unwrap().unwrap();
        assert_eq!(latest.height, 200);
        assert_eq!(latest.status, CheckpointStatus::Finalized);

        let late = node
            .manager
            .submit_miner_approval(approval_for(&checkpoint, &miners[5]))
            .await;
        assert!(matches!(
            late,
            Err(DualApprovalError::CheckpointNotPending {
                status: CheckpointStatus::Finalized,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_unapproved_checkpoint_expires_and_next_opens() {
        let (node, _shutdown) = start_node();
        let mut checkpoints = node
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Checkpoint]));
        let miners = register_miners(&node, 7).await;

        node.bus.publish(end_of_block(200)).await;
        wait_for(&mut checkpoints, |e| {
            matches!(e, BlockchainEvent::CheckpointCreated { height: 200, .. })
        })
        .await;

        let checkpoint = pending_at(&node, 200).await;
        for miner in miners.iter().take(3) {
            node.manager
                .submit_miner_approval(approval_for(&checkpoint, miner))
                .await
                .unwrap();
        }

        node.bus.publish(end_of_block(300)).await;
        node.bus.publish(end_of_block(301)).await;
        let expired = wait_for(&mut checkpoints, |e| {
            matches!(e, BlockchainEvent::CheckpointExpired { .. })
        })
        .await;
        assert_eq!(expired, BlockchainEvent::CheckpointExpired { height: 200 });

        let stored = node.manager.get_checkpoint(200).await.unwrap();
        assert_eq!(stored.status, CheckpointStatus::Expired);
        assert_eq!(stored.approval_count(), 3);
        assert!(node.manager.get_latest_checkpoint().await.unwrap().is_none());

        node.bus.publish(end_of_block(400)).await;
        wait_for(&mut checkpoints, |e| {
            matches!(e, BlockchainEvent::CheckpointCreated { height: 400, .. })
        })
        .await;

        let pending = pending_at(&node, 400).await;
        assert!(pending.is_pending());
    }

    #[tokio::test]
    async fn test_forged_result_slashes_miner() {
        let (node, _shutdown) = start_node();
        let mut registry_events = node
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::MinerRegistry]));
        let miners = register_miners(&node, 5).await;

        node.bus.publish(end_of_block(200)).await;
        let checkpoint = pending_at(&node, 200).await;

        let mut forged = approval_for(&checkpoint, &miners[0]);
        forged.docking_result.affinity = "-12.000".into();

        let err = node.manager.submit_miner_approval(forged).await.unwrap_err();
        assert!(matches!(err, DualApprovalError::InvalidDockingResult(_)));

        let slashed = wait_for(&mut registry_events, |e| {
            matches!(e, BlockchainEvent::MinerSlashed { .. })
        })
        .await;
        assert_eq!(
            slashed,
            BlockchainEvent::MinerSlashed {
                address: miners[0].clone(),
                reason: "invalid_docking_result".into(),
                new_reputation: 300,
            }
        );

        let miner = node.registry.get_miner(&miners[0]).await.unwrap();
        assert_eq!(miner.reputation, 300);
        assert!(!miner.slashed);

        let checkpoint = node.manager.get_checkpoint(200).await.unwrap();
        assert_eq!(checkpoint.approval_count(), 0);
    }
}
