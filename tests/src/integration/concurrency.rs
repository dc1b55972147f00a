//! # Concurrent Approvals
//!
//! Many miners race to approve one checkpoint. The ledger lock must admit
//! exactly one finalizing approval and never lose an accepted one.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::seq::SliceRandom;
    use tokio::time::timeout;

    use node_runtime::{DualApprovalContainer, NodeConfig};
    use nx_dual_approval::{CheckpointApi, CheckpointStatus, DualApprovalError};
    use shared_bus::{BlockchainEvent, EventFilter, EventTopic};

    use crate::integration::{approval_for, job, register_miners};

    async fn open_checkpoint(node: &DualApprovalContainer, height: u64) {
        node.work_queue.extend((1..=10).map(job));
        let outcome = node
            .trigger
            .on_end_block(height, &format!("block-{height}"), "valset")
            .await
            .unwrap();
        assert_eq!(outcome.created, Some(height));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_miners_finalize_exactly_once() {
        let node = Arc::new(DualApprovalContainer::new(NodeConfig::default()).unwrap());
        let mut checkpoint_events = node
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Checkpoint]));

        let mut miners = register_miners(&node, 10).await;
        miners.shuffle(&mut rand::thread_rng());
        open_checkpoint(&node, 200).await;
        let checkpoint = node.manager.get_pending_checkpoint().await.unwrap().unwrap();

        let handles: Vec<_> = miners
            .iter()
            .map(|miner| {
                let node = node.clone();
                let approval = approval_for(&checkpoint, miner);
                tokio::spawn(async move { node.manager.submit_miner_approval(approval).await })
            })
            .collect();

        let mut accepted = 0;
        let mut finalizing = 0;
        let mut rejected = 0;
        for handle in handles {
            match timeout(Duration::from_secs(10), handle).await.unwrap().unwrap() {
                Ok(receipt) => {
                    accepted += 1;
                    if receipt.finalized {
                        finalizing += 1;
                        // 7 of 10 is the first count meeting 67%
                        assert_eq!(receipt.total_approvals, 7);
                    }
                }
                Err(DualApprovalError::CheckpointNotPending { status, .. }) => {
                    assert_eq!(status, CheckpointStatus::Finalized);
                    rejected += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(finalizing, 1);
        assert_eq!(accepted, 7);
        assert_eq!(rejected, 3);

        let stored = node.manager.get_checkpoint(200).await.unwrap();
        assert!(stored.is_finalized());
        assert_eq!(stored.approval_count(), 7);

        let mut finalized_events = 0;
        while let Ok(Some(event)) = checkpoint_events.try_recv() {
            if matches!(event, BlockchainEvent::CheckpointFinalized { .. }) {
                finalized_events += 1;
            }
        }
        assert_eq!(finalized_events, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replayed_approval_counted_once() {
        let node = Arc::new(DualApprovalContainer::new(NodeConfig::default()).unwrap());
        let miners = register_miners(&node, 10).await;
        open_checkpoint(&node, 200).await;
        let checkpoint = node.manager.get_pending_checkpoint().await.unwrap().unwrap();

        let approval = approval_for(&checkpoint, &miners[0]);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let node = node.clone();
                let approval = approval.clone();
                tokio::spawn(async move { node.manager.submit_miner_approval(approval).await })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(DualApprovalError::DuplicateApproval { address, height }) => {
                    assert_eq!(address, miners[0]);
                    assert_eq!(height, 200);
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(accepted, 1);
        let stored = node.manager.get_checkpoint(200).await.unwrap();
        assert_eq!(stored.approval_count(), 1);
        assert!(stored.is_pending());
    }
}
