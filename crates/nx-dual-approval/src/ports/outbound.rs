//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The core reaches storage, the work queue and the clock only through
//! these traits.

use crate::domain::{Checkpoint, DockingJob, Miner, Timestamp};
use crate::error::{DualApprovalResult, KVStoreError};

/// Result of a prefix scan: `(key, value)` pairs.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
///
/// Production uses RocksDB. Tests use an in-memory HashMap.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either all operations in the batch are applied, or none are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Source of docking work for new checkpoints.
pub trait WorkQueue: Send + Sync {
    /// Hand out up to `limit` pending jobs, marking them consumed.
    ///
    /// Returns fewer jobs (possibly none) when the queue runs dry.
    fn take_pending(&self, limit: usize) -> Vec<DockingJob>;
}

/// One write inside a [`LedgerBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerWrite {
    Checkpoint(Checkpoint),
    PendingHeight(u64),
    LatestHeight(u64),
    Miner(Miner),
    MinerCount(u64),
}

/// A set of ledger writes applied atomically by [`ApprovalLedger::commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerBatch {
    writes: Vec<LedgerWrite>,
}

impl LedgerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_checkpoint(mut self, checkpoint: Checkpoint) -> Self {
        self.writes.push(LedgerWrite::Checkpoint(checkpoint));
        self
    }

    pub fn set_pending_height(mut self, height: u64) -> Self {
        self.writes.push(LedgerWrite::PendingHeight(height));
        self
    }

    pub fn set_latest_height(mut self, height: u64) -> Self {
        self.writes.push(LedgerWrite::LatestHeight(height));
        self
    }

    pub fn put_miner(mut self, miner: Miner) -> Self {
        self.writes.push(LedgerWrite::Miner(miner));
        self
    }

    pub fn set_miner_count(mut self, count: u64) -> Self {
        self.writes.push(LedgerWrite::MinerCount(count));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn into_writes(self) -> Vec<LedgerWrite> {
        self.writes
    }
}

/// Typed repository over checkpoints and miners.
///
/// Key layout and encoding belong to the implementation. Callers mutate
/// state only through [`ApprovalLedger::commit`].
pub trait ApprovalLedger: Send + Sync {
    fn checkpoint(&self, height: u64) -> DualApprovalResult<Option<Checkpoint>>;

    fn has_checkpoint(&self, height: u64) -> DualApprovalResult<bool>;

    /// Height of the most recently opened checkpoint
    fn pending_height(&self) -> DualApprovalResult<Option<u64>>;

    /// Height of the most recently finalized checkpoint
    fn latest_height(&self) -> DualApprovalResult<Option<u64>>;

    /// All checkpoints in ascending height order
    fn list_checkpoints(&self) -> DualApprovalResult<Vec<Checkpoint>>;

    fn miner(&self, address: &str) -> DualApprovalResult<Option<Miner>>;

    fn has_miner(&self, address: &str) -> DualApprovalResult<bool>;

    /// Number of miners ever registered
    fn miner_count(&self) -> DualApprovalResult<u64>;

    /// All miners in ascending address order
    fn list_miners(&self) -> DualApprovalResult<Vec<Miner>>;

    /// Apply every write in `batch` atomically.
    fn commit(&mut self, batch: LedgerBatch) -> DualApprovalResult<()>;
}
