//! # Dual-Approval Container
//!
//! Holds the registry, manager and trigger with their shared ledger, clock
//! and event bus.
//!
//! ```text
//! ledger ──┬──→ MinerRegistry ──→ CheckpointManager ──→ PeriodTrigger
//!          │          ↑                   ↑
//! bus ─────┴──────────┴───────────────────┘
//! ```

pub mod config;

pub use config::{NodeConfig, NodeConfigError, StorageBackend};

use crate::adapters::storage::InMemoryKVStore;
use nx_dual_approval::{
    CheckpointManager, InMemoryWorkQueue, KVStoreError, KeyValueStore, KvLedger, MinerRegistry,
    PeriodTrigger, SystemTimeSource,
};
use parking_lot::RwLock;
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub type NodeStore = Box<dyn KeyValueStore>;
pub type NodeLedger = KvLedger<NodeStore>;
pub type NodeRegistry = MinerRegistry<NodeLedger, SystemTimeSource>;
pub type NodeManager = CheckpointManager<NodeLedger, SystemTimeSource, InMemoryWorkQueue>;
pub type NodeTrigger = PeriodTrigger<NodeManager>;

/// Startup errors
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] NodeConfigError),

    #[error("Failed to open ledger storage: {0}")]
    Storage(#[from] KVStoreError),
}

pub struct DualApprovalContainer {
    pub config: NodeConfig,
    pub bus: Arc<InMemoryEventBus>,
    pub work_queue: Arc<InMemoryWorkQueue>,
    pub registry: Arc<NodeRegistry>,
    pub manager: Arc<NodeManager>,
    pub trigger: Arc<NodeTrigger>,
}

impl DualApprovalContainer {
    /// Validate `config`, open the configured store and wire everything.
    pub fn new(config: NodeConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        let store = open_store(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Wire the components over an already opened store.
    pub fn with_store(config: NodeConfig, store: NodeStore) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let work_queue = Arc::new(InMemoryWorkQueue::new());
        let ledger = Arc::new(RwLock::new(KvLedger::new(store)));

        let registry = Arc::new(MinerRegistry::new(
            config.dual_approval.clone(),
            ledger,
            Arc::new(SystemTimeSource),
            bus.clone(),
        ));
        let manager = Arc::new(CheckpointManager::new(registry.clone(), work_queue.clone()));
        let trigger = Arc::new(PeriodTrigger::new(
            manager.clone(),
            config.dual_approval.checkpoint_interval,
        ));

        info!(
            backend = ?config.storage_backend,
            interval = config.dual_approval.checkpoint_interval,
            min_signers = config.dual_approval.min_checkpoint_signers,
            threshold = config.dual_approval.checkpoint_threshold_percent,
            "[dual-approval] Container ready"
        );

        Self {
            config,
            bus,
            work_queue,
            registry,
            manager,
            trigger,
        }
    }
}

fn open_store(config: &NodeConfig) -> Result<NodeStore, ContainerError> {
    match config.storage_backend {
        StorageBackend::Memory => Ok(Box::new(InMemoryKVStore::new())),
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => {
            let store = crate::adapters::storage::RocksDbStore::open_default(config.ledger_path())?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => Err(NodeConfigError::BackendUnavailable.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_dual_approval::{CheckpointApi, MinerRegistryApi};

    #[tokio::test]
    async fn test_memory_container_wires_shared_ledger() {
        let container = DualApprovalContainer::new(NodeConfig::default()).unwrap();

        container
            .registry
            .register_miner("nexus1miner", "pk")
            .await
            .unwrap();
        container
            .trigger
            .on_end_block(200, "block-200", "valset")
            .await
            .unwrap();

        assert_eq!(container.registry.active_miner_count().await.unwrap(), 1);
        let pending = container.manager.get_pending_checkpoint().await.unwrap();
        assert_eq!(pending.map(|c| c.height), Some(200));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = NodeConfig::default();
        config.dual_approval.checkpoint_threshold_percent = 0;
        assert!(matches!(
            DualApprovalContainer::new(config),
            Err(ContainerError::Config(_))
        ));
    }
}
